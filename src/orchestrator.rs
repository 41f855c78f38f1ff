//! Network division orchestrator.
//!
//! This module drives a whole network description through allocation,
//! rendering and output, one parent network at a time and in input order.

use crate::config::{NetworkDocument, NetworkSpec};
use crate::ip::{
    capacity, coalesce, expand_requests, order_allocations, AddressBlock, AllocationError,
    BuddyAllocator, CapacityReport, OrderedAllocation,
};
use crate::output::OutputSink;
use crate::render::{NetworkAttributes, TemplateRenderer};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{error, info};

/// Outcome of dividing one parent network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlan {
    pub parent: AddressBlock,
    pub capacity: CapacityReport,
    /// Allocations in address order, numbered from 1
    pub allocations: Vec<OrderedAllocation>,
    /// Unused space in minimal CIDR form
    pub remainder: Vec<AddressBlock>,
}

impl NetworkPlan {
    /// Block assigned to the subnet `label`
    pub fn block_for(&self, label: &str) -> Option<AddressBlock> {
        self.allocations
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.block)
    }
}

/// Divide one parent network according to its subnet list.
///
/// Nothing is returned for a network that fails any check, so a failed
/// network never produces partial output.
pub fn plan_network(spec: &NetworkSpec) -> Result<NetworkPlan, AllocationError> {
    let parent = AddressBlock::parse(&spec.network)?;

    let capacity = capacity::check(&parent, &spec.subnets)?;
    let mut requests = expand_requests(&parent, &spec.subnets)?;

    let mut allocator = BuddyAllocator::new(parent, &requests);
    allocator.assign_all(&mut requests)?;

    let remainder = coalesce::remainder(&allocator.into_free_queue());
    let allocations = order_allocations(&requests);

    Ok(NetworkPlan {
        parent,
        capacity,
        allocations,
        remainder,
    })
}

/// Human-readable summary of unused space, if there is any
pub fn remainder_message(remainder: &[AddressBlock]) -> Option<String> {
    if remainder.is_empty() {
        return None;
    }
    let plural = if remainder.len() > 1 { "networks" } else { "network" };
    let blocks: Vec<String> = remainder.iter().map(|b| b.to_string()).collect();
    Some(format!("Remaining {}: {}", plural, blocks.join(", ")))
}

/// Options controlling a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Continue with the next network after one fails to divide
    pub keep_going: bool,
}

/// Totals for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub networks: usize,
    pub failed: usize,
    pub rendered: usize,
}

/// Divide every network in the document, render each subnet and write it out.
pub fn run(
    document: &NetworkDocument,
    renderer: &TemplateRenderer,
    sink: &OutputSink,
    options: RunOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for spec in document {
        summary.networks += 1;

        let plan = match plan_network(spec) {
            Ok(plan) => plan,
            Err(e) if options.keep_going => {
                error!("{}", e);
                summary.failed += 1;
                continue;
            }
            Err(e) => return Err(e).wrap_err_with(|| format!("Failed to divide {}", spec.network)),
        };

        info!(
            "Divided {} into {} subnet(s) using {} of {} addresses",
            plan.parent,
            plan.allocations.len(),
            plan.capacity.requested,
            plan.capacity.available
        );

        // Render everything before writing so a template error leaves no partial output
        let rendered = plan
            .allocations
            .iter()
            .map(|allocation| {
                let attributes = NetworkAttributes::new(allocation);
                renderer.render(&attributes).map(|text| (allocation.label.as_str(), text))
            })
            .collect::<Result<Vec<_>, _>>()
            .wrap_err_with(|| format!("Failed to render subnets of {}", plan.parent))?;

        for (label, text) in &rendered {
            sink.write(label, text)?;
        }
        summary.rendered += rendered.len();

        if let Some(message) = remainder_message(&plan.remainder) {
            info!("{}", message);
        }
    }

    if summary.failed > 0 {
        return Err(eyre!(
            "{} of {} network(s) could not be divided",
            summary.failed,
            summary.networks
        ));
    }

    Ok(summary)
}
