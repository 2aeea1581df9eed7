mod add;
mod export;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::GridConfig;
use crate::engine::{
    format_hours_as_clock, CharWidthMeasure, Geometry, RemarkLayoutEngine, SegmentStore,
};
use crate::services::storage::{default_data_dir, JsonFileStorage, LogStorage};
use crate::tui::widgets::log_grid::{render_to_lines, LogGrid, RenderInput};
use crate::types::{HoslogError, Result, SegmentSequence};

pub use add::{parse_time, AddArgs};
pub use export::ExportArgs;

/// Driver's daily log on a 24-hour grid
#[derive(Parser)]
#[command(name = "hoslog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Grid config file (default: ~/.hoslog/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved log (default: ~/.hoslog)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a duty-status segment
    Add(AddArgs),

    /// Draw the log grid (default)
    Show {
        /// Terminal width to draw for (default: current terminal)
        #[arg(long)]
        width: Option<u16>,
    },

    /// Show hours per duty status
    Totals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where each remark label goes
    Remarks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved segments
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every saved segment
    Clear,

    /// Export the log as JSON, then clear it
    Export(ExportArgs),
}

/// Config and storage resolved from global flags
pub struct Session {
    pub config: GridConfig,
    pub storage: JsonFileStorage,
}

impl Session {
    fn open(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let config_path = config.unwrap_or_else(|| data_dir.join("config.json"));
        let config = GridConfig::load(&config_path)?;
        let storage = JsonFileStorage::with_data_dir(data_dir, config.grid_width());
        Ok(Self { config, storage })
    }

    fn load(&self) -> SegmentSequence {
        let (sequence, warning) = self.storage.load();
        if let Some(warning) = warning {
            eprintln!("warning: {}", warning);
        }
        sequence
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let session = Session::open(self.config, self.data_dir)?;

        match self.command {
            Some(Commands::Add(args)) => args.run(&session)?,
            None => show(&session, None)?,
            Some(Commands::Show { width }) => show(&session, width)?,
            Some(Commands::Totals { json }) => totals(&session, json)?,
            Some(Commands::Remarks { json }) => remarks(&session, json)?,
            Some(Commands::List { json }) => list(&session, json)?,
            Some(Commands::Clear) => {
                session.storage.clear()?;
                println!("Cleared all entries.");
            }
            Some(Commands::Export(args)) => args.run(&session)?,
        }
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| HoslogError::Parse(e.to_string()))
}

fn show(session: &Session, width: Option<u16>) -> Result<()> {
    let config = &session.config;
    let sequence = session.load();

    let width = width
        .or_else(|| crossterm::terminal::size().ok().map(|(cols, _)| cols))
        .unwrap_or(80);
    let grid_cols = LogGrid::grid_cols(width);

    let measure = LogGrid::cell_measure(config, grid_cols);
    let layout = RemarkLayoutEngine::from_config(config).layout(&sequence, &measure);
    let totals = SegmentStore::new(Geometry::from_config(config)).compute_totals(&sequence);

    let input = RenderInput {
        grid_height: config.grid_height(),
        segments: sequence.segments(),
        layout: &layout,
        totals: &totals,
    };
    for line in render_to_lines(LogGrid::new(config, input), LogGrid::total_width(grid_cols)) {
        println!("{}", line);
    }
    Ok(())
}

fn totals(session: &Session, json: bool) -> Result<()> {
    let sequence = session.load();
    let totals = SegmentStore::new(Geometry::from_config(&session.config)).compute_totals(&sequence);

    if json {
        println!("{}", to_json(&totals)?);
        return Ok(());
    }
    for (name, hours) in session.config.categories.iter().zip(totals.per_category_hours) {
        println!("{:<14} {}", name, format_hours_as_clock(hours));
    }
    println!("{:<14} {}", "Total", format_hours_as_clock(totals.grand_total_hours));
    Ok(())
}

fn remarks(session: &Session, json: bool) -> Result<()> {
    let config = &session.config;
    let sequence = session.load();
    let measure = CharWidthMeasure::from_config(config);
    let layout = RemarkLayoutEngine::from_config(config).layout(&sequence, &measure);

    if json {
        println!("{}", to_json(&layout)?);
        return Ok(());
    }
    for p in &layout.placements {
        println!(
            "row {}  x {:>7.1}..{:<7.1}  {}",
            p.row_index,
            p.text_left_x,
            p.right(),
            sequence.segments()[p.segment_index].remark
        );
    }
    println!(
        "{} row(s), height {:.0}px",
        layout.row_count, layout.required_height
    );
    Ok(())
}

fn list(session: &Session, json: bool) -> Result<()> {
    let sequence = session.load();
    if json {
        println!("{}", to_json(&sequence)?);
        return Ok(());
    }
    if sequence.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    let geometry = Geometry::from_config(&session.config);
    for (i, seg) in sequence.iter().enumerate() {
        let name = session
            .config
            .categories
            .get(seg.category_index)
            .map(String::as_str)
            .unwrap_or("?");
        println!(
            "{:>3}  {} - {}  {:<14} {}",
            i,
            geometry.x_to_time(seg.from_x),
            geometry.end_label(seg.to_x),
            name,
            seg.remark
        );
    }
    Ok(())
}
