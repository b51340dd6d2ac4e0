#![cfg(not(tarpaulin_include))]

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use usergrid::clock::SystemClock;
use usergrid::config::Config;
use usergrid::downloader::to_csv;
use usergrid::grid::{Grid, Page};
use usergrid::store::open_store;
use usergrid::table::{Column, SortDirection};
use usergrid::viewport::Viewport;

/// Rows shown per screen in the terminal
const SCREEN_ROWS: u32 = 20;

/// Widest a terminal cell is allowed to get
const MAX_CELL_WIDTH: usize = 28;

fn print_page(page: &Page<'_>) {
    let widths: Vec<usize> = page
        .columns
        .iter()
        .map(|column| {
            page.rows
                .iter()
                .map(|row| column.value(row).chars().count())
                .chain(std::iter::once(column.key().len() + 2))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header: Vec<String> = page
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| {
            let marker = match page.sort.current() {
                Some((sorted, SortDirection::Asc)) if sorted == *column => " ^",
                Some((sorted, SortDirection::Desc)) if sorted == *column => " v",
                _ => "",
            };
            pad(&format!("{}{}", column.key(), marker), *width)
        })
        .collect();
    println!("      {}", header.join(" | "));

    for (offset, row) in page.rows.iter().enumerate() {
        let cells: Vec<String> = page
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| pad(&column.value(row), *width))
            .collect();
        println!("{:>5} {}", page.start + offset + 1, cells.join(" | "));
    }
    println!("rows {}-{} of {}", page.start + 1, page.end, page.total);
}

fn pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::parse();
    let store = open_store(&config.store)?;
    let generator = config.generator();
    let clock = SystemClock;
    let viewport = Viewport {
        row_height: 1,
        height: SCREEN_ROWS,
        overscan: 0,
    };

    let mut grid = Grid::load_or_generate(store.as_ref(), &generator, &clock);
    let mut scroll_top: u64 = 0;
    let mut status = String::from("ok");
    let mut show = true;
    let mut start_time = Instant::now();

    loop {
        if show {
            print_page(&grid.render(&clock, &viewport, scroll_top));
        }

        print!("[{:.1}] ({}) > ", start_time.elapsed().as_secs_f64(), status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();
        status = String::from("ok");

        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.as_slice() {
            [] => status = String::from("invalid command"),
            ["q"] => break,
            ["help"] => {
                println!("Commands:");
                println!("  q: Quit");
                println!("  w: Scroll up one screen");
                println!("  s: Scroll down one screen");
                println!("  sort <column>: Cycle sorting on a column");
                println!("  move <from> <to>: Move a column to another column's place");
                println!("  regen: Replace all records with new ones");
                println!("  export <file>: Write the grid as CSV");
                println!("  disable_output / enable_output: Toggle the table display");
                let keys: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
                println!("Columns: {}", keys.join(", "));
            }
            ["w"] => {
                scroll_top = scroll_top.saturating_sub(viewport.page_rows() as u64);
            }
            ["s"] => {
                let max = viewport.max_scroll(grid.records().len());
                scroll_top = (scroll_top + viewport.page_rows() as u64).min(max);
            }
            ["sort", key] => match key.parse::<Column>() {
                Ok(column) => {
                    grid.toggle_sort(column);
                }
                Err(e) => status = e.to_string(),
            },
            ["move", from, to] => match (from.parse::<Column>(), to.parse::<Column>()) {
                (Ok(from), Ok(to)) => {
                    if !grid.move_column(from, to) {
                        status = String::from("unchanged");
                    }
                }
                (Err(e), _) | (_, Err(e)) => status = e.to_string(),
            },
            ["regen"] => {
                grid.regenerate(store.as_ref(), &generator, &clock);
                scroll_top = 0;
            }
            ["export", path] => {
                let rows = grid.rows_in_view_order(&clock);
                if let Err(e) = fs::write(path, to_csv(&rows, grid.columns())) {
                    status = e.to_string();
                }
            }
            ["disable_output"] => show = false,
            ["enable_output"] => show = true,
            _ => status = String::from("invalid command"),
        }
    }

    Ok(())
}
