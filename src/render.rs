//! Template rendering of allocated subnets.
//!
//! Each allocation is turned into a flat attribute set ([`NetworkAttributes`])
//! and fed to a Jinja-style template through Tera.

use crate::ip::OrderedAllocation;
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

/// Blocks larger than this render an empty `addresses` list.
pub const MAX_LISTED_ADDRESSES: u128 = 65_536;

/// Values exposed to templates for one allocated subnet
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NetworkAttributes {
    /// 1-based position of the subnet in address order
    pub port: usize,
    pub name: String,
    /// CIDR notation, e.g. "10.0.0.0/26"
    pub prefix: String,
    pub network: String,
    pub gateway: String,
    pub broadcast: String,
    /// First usable address after the gateway
    pub start: String,
    pub end: String,
    /// Every address except the network and broadcast addresses
    pub addresses: Vec<String>,
    pub netmask: String,
    /// Prefix length
    pub size: u8,
}

impl NetworkAttributes {
    pub fn new(allocation: &OrderedAllocation) -> Self {
        let block = allocation.block;
        let net = block.net();
        let span = block.last() - block.base();
        let at = |offset: u128| block.family().address(block.base() + offset).to_string();

        // Point-to-point and host blocks have no network/broadcast to reserve.
        let (gateway, start, end, addresses) = if span >= 3 {
            let addresses = if span < MAX_LISTED_ADDRESSES {
                (1..span).map(at).collect()
            } else {
                log::warn!(
                    "{} ({}) is too large to list its addresses; rendering an empty list",
                    allocation.label,
                    block
                );
                Vec::new()
            };
            (at(1), at(2), at(span - 1), addresses)
        } else {
            (at(span.min(1)), at(0), at(span), (0..=span).map(at).collect())
        };

        Self {
            port: allocation.ordinal,
            name: allocation.label.clone(),
            prefix: block.to_string(),
            network: net.network().to_string(),
            gateway,
            broadcast: net.broadcast().to_string(),
            start,
            end,
            addresses,
            netmask: net.netmask().to_string(),
            size: net.prefix_len(),
        }
    }
}

/// Errors raised while loading or rendering a template
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{path} was not found")]
    TemplateNotFound { path: String },

    #[error("Template {name} is not valid")]
    InvalidTemplate {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to render template for {label}")]
    Render {
        label: String,
        #[source]
        source: tera::Error,
    },
}

/// A single loaded template
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
    name: String,
}

impl TemplateRenderer {
    /// Load the template at `path`.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        if !path.is_file() {
            return Err(RenderError::TemplateNotFound {
                path: path.display().to_string(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template".to_string());

        let mut tera = Self::engine();
        tera.add_template_file(path, Some(&name))
            .map_err(|source| RenderError::InvalidTemplate { name: name.clone(), source })?;

        log::debug!("Loaded template {} from {}", name, path.display());
        Ok(Self { tera, name })
    }

    /// Build a renderer from template text.
    pub fn from_source(name: &str, source: &str) -> Result<Self, RenderError> {
        let mut tera = Self::engine();
        tera.add_raw_template(name, source)
            .map_err(|source| RenderError::InvalidTemplate { name: name.to_string(), source })?;

        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }

    fn engine() -> Tera {
        let mut tera = Tera::default();
        // Templates produce config files, never HTML
        tera.autoescape_on(vec![]);
        tera
    }

    /// Render the template for one subnet.
    ///
    /// A single trailing newline is dropped, as Jinja does.
    pub fn render(&self, attributes: &NetworkAttributes) -> Result<String, RenderError> {
        let render_err = |source| RenderError::Render {
            label: attributes.name.clone(),
            source,
        };

        let context = Context::from_serialize(attributes).map_err(render_err)?;
        let mut rendered = self.tera.render(&self.name, &context).map_err(render_err)?;
        if rendered.ends_with('\n') {
            rendered.pop();
        }

        Ok(rendered)
    }
}
