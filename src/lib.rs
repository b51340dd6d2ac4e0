/*!
# User Grid

A browser-based data grid over several hundred synthetic user records,
served by a Rust backend.

## Overview

Records are loaded from a record store (or generated when the store is
empty or unreadable) and shown in a table with windowed scrolling, sorting
and drag-to-reorder columns. Two display-only fields are derived at render
time and never stored:

- **fullName** - first and last name joined by a single space
- **dsr** - whole calendar days since the registration date

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS, JavaScript
- **Key Components**:
  - Row Window - Renders only the rows inside the scroll viewport
  - Header - Click to cycle sorting, drag to reorder columns
  - Toolbar - Regenerate records, export CSV

### Backend Layer
- **Technologies**: Rust, axum (feature `web`)
- **Core Components**:
  - Field Enrichment Engine - Derives `fullName` and `dsr` for a day supplied by a clock
  - Record Generator - Synthetic users from fixed name and city pools
  - Table State - Sort descriptor and column order
  - Viewport - Fixed-height row windowing
  - Grid - Ties records, presentation state and rendering together

### Data Persistence Layer
- One record collection per store, written wholesale
- JSON file (`database/users.json`) or gzip-compressed bincode snapshot (`.bin.gz`)
- Store handles are passed in explicitly; nothing reads an ambient key

## Modules

- **record**: Persisted record type and validation
- **clock**: Injected source of "today"
- **enrich**: Derived display fields
- **generator**: Synthetic records
- **store**: Store trait, JSON and in-memory stores
- **saving**: Compressed snapshot store
- **table**: Columns, sorting and column order
- **viewport**: Row windowing
- **grid**: Load, regenerate and render
- **downloader**: CSV export
- **config**: Command-line and environment configuration
- **app**: Routing and handlers (feature `web`)

## REST API Endpoints

- `GET /` - Grid page
- `GET /api/rows?scroll_top=&height=` - One window of enriched, sorted rows
- `POST /api/sort` - Cycle sorting on a column
- `POST /api/columns` - Move a column
- `POST /api/regenerate` - Replace all records
- `GET /api/export.csv` - Current view as CSV
*/

pub mod clock;
pub mod config;
pub mod downloader;
pub mod enrich;
pub mod generator;
pub mod grid;
pub mod record;
pub mod saving;
pub mod store;
pub mod table;
pub mod viewport;

#[cfg(feature = "web")]
pub mod app;

pub use clock::*;
pub use enrich::*;
pub use grid::*;
pub use record::*;
pub use store::*;
