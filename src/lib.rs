//! # Subnetter - Divide networks into subnets and render their configs
//!
//! This library carves parent IPv4/IPv6 networks into the subnets a
//! network description asks for, and renders a config file per subnet from
//! a Jinja-style template.
//!
//! ## Overview
//!
//! A network description lists parent networks and, for each, the subnets
//! to create: a name, a prefix length, and optionally how many (`number`)
//! and how many per row (`per-row`). Subnetter checks that they fit,
//! assigns every subnet an aligned block, and reports the unused space in
//! minimal CIDR form.
//!
//! ## Allocation Policy
//!
//! - **Largest first**: the parent is split into blocks of the largest
//!   requested size; smaller sizes are reached by splitting free blocks in two
//! - **Deterministic**: within one size, subnets take the lowest free blocks
//!   in declaration order
//! - **Address-ordered output**: subnets are rendered sorted by address and
//!   numbered from 1 (`port` in templates)
//!
//! ## Architecture
//!
//! - `ip`: address blocks, request expansion, capacity check, buddy
//!   allocator, remainder coalescing and output ordering
//! - `config`: network description structures and validation
//! - `config_loader`: description file loading (JSON, or YAML by extension)
//! - `render`: per-subnet template attributes and Tera rendering
//! - `output`: stdout and per-file output sinks
//! - `orchestrator`: drives a whole description through the pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use subnetter::{config_loader, orchestrator, output::OutputSink, render::TemplateRenderer};
//! use std::path::Path;
//!
//! let document = config_loader::load_document(Path::new("networks.json"))?;
//! let renderer = TemplateRenderer::from_path(Path::new("dhcpd.j2"))?;
//!
//! orchestrator::run(&document, &renderer, &OutputSink::Stdout, Default::default())?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Network Description Format
//!
//! ```json
//! [
//!   {
//!     "network": "10.0.0.0/24",
//!     "subnets": [
//!       {"name": "servers", "size": 26, "number": 2},
//!       {"name": "desks", "size": 29, "number": 2, "per-row": 3},
//!       {"name": "uplink", "size": 30}
//!     ]
//!   }
//! ]
//! ```
//!
//! ## Error Handling
//!
//! Allocation failures are typed (`ip::AllocationError`); the loading and
//! orchestration layers return `color_eyre` reports with context.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod orchestrator;
pub mod output;
pub mod render;
