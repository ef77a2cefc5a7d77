//! Workspace layout console
//!
//! Edits the persisted set of workspace rectangles. Every change is written
//! to the storage slot immediately.
//!
//! Usage:
//!   cargo run --bin workspace                 # interactive
//!   cargo run --bin workspace -- move 2 50 80 # single command
//!
//! Environment:
//!   FEEDBOARD_CONFIG_PATH - YAML config (default config/feedboard.yaml)

use anyhow::Result;
use feedboard::{clamp_size, init_tracing, FileStore, LayoutStore};
use feedboard_app::bin_common::{load_config, parse_args, ConfigType, LayoutCommand};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

type Layout = LayoutStore<FileStore>;

fn print_layout(layout: &Layout) {
    println!("{:>4} {:>6} {:>6} {:>6} {:>6} {:>4}", "id", "x", "y", "w", "h", "z");
    for element in layout.elements() {
        println!(
            "{:>4} {:>6} {:>6} {:>6} {:>6} {:>4}",
            element.id, element.x, element.y, element.width, element.height, element.z_index
        );
    }
}

/// Apply one command; returns `false` on quit
fn apply(layout: &mut Layout, command: LayoutCommand) -> Result<bool> {
    let found = match command {
        LayoutCommand::List => {
            print_layout(layout);
            true
        }
        LayoutCommand::Front(id) => layout.bring_to_front(id)?,
        LayoutCommand::Move { id, x, y } => layout.move_to(id, x, y)?,
        LayoutCommand::Resize { id, width, height } => {
            let (width, height) = clamp_size(width, height);
            layout.resize(id, width, height)?
        }
        LayoutCommand::Remove(id) => layout.remove(id)?,
        LayoutCommand::Reset => {
            layout.reset_all()?;
            true
        }
        LayoutCommand::Help => {
            println!("{}", LayoutCommand::HELP);
            true
        }
        LayoutCommand::Quit => return Ok(false),
    };

    if !found {
        warn!("No such element");
    }
    Ok(true)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = load_config(ConfigType::Feedboard)?;
    init_tracing(&config.log_level);

    let store = FileStore::open(&config.storage.dir)?;
    let mut layout = LayoutStore::load(store, config.storage.layout_key.as_str())?;
    info!(
        "Layout {:?} in {:?}: {} elements",
        layout.key(),
        config.storage.dir,
        layout.len()
    );

    let args = parse_args();
    if !args.is_empty() {
        let command: LayoutCommand = args.join(" ").parse()?;
        apply(&mut layout, command)?;
        print_layout(&layout);
        return Ok(());
    }

    println!("{}", LayoutCommand::HELP);
    print_layout(&layout);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.parse::<LayoutCommand>() {
            Ok(command) => {
                if !apply(&mut layout, command)? {
                    break;
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    Ok(())
}
