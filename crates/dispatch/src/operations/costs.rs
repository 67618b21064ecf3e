//! Cost history, rendered as a graph payload rather than text.

use async_trait::async_trait;

use stratus_protocol::{GraphSeries, ResponseItem};

use crate::context::ExecContext;
use crate::error::Result;
use crate::operation::{Operation, Outcome};

use super::GET_TOTAL_COSTS;

/// How many months of invoices the graph covers.
const MONTHS_SHOWN: usize = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub struct GetTotalCosts;

#[async_trait]
impl Operation for GetTotalCosts {
    fn name(&self) -> &'static str {
        GET_TOTAL_COSTS
    }

    async fn execute(&self, ctx: &ExecContext) -> Result<Outcome> {
        let invoices = ctx.client().invoices(ctx.token()).await?;

        // The API returns newest first; the graph reads oldest to newest.
        let mut x = Vec::new();
        let mut y = Vec::new();
        for invoice in invoices.iter().take(MONTHS_SHOWN).rev() {
            let month = MONTH_NAMES
                .get(invoice.month.saturating_sub(1) as usize)
                .copied()
                .unwrap_or("???");
            x.push(format!("{month} {}", invoice.year));
            y.push(invoice.total);
        }

        Ok(Outcome::Reply(vec![ResponseItem::graph(GraphSeries {
            x,
            y,
            graph_id: 1,
        })]))
    }
}
