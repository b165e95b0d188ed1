use crate::activity::ActivityLog;
use crate::auth::Operator;
use crate::inventory::{self, StockLine};
use crate::models::{Fleet, FleetLoad, StockLedger};
use crate::roster::{Roster, RosterMetrics};

/// All state of one event desk, passed explicitly to every handler
#[derive(Debug, Clone)]
pub struct EventContext {
    pub roster: Roster,
    pub stock: StockLedger,
    pub fleet: Fleet,
    pub activity: ActivityLog,
    pub operator: Operator,
}

impl EventContext {
    pub fn new(fleet: Fleet, operator: Operator) -> Self {
        Self {
            roster: Roster::default(),
            stock: StockLedger::default(),
            fleet,
            activity: ActivityLog::default(),
            operator,
        }
    }

    pub fn loads(&self) -> FleetLoad {
        self.fleet.loads(self.roster.attendees())
    }

    pub fn stock_summary(&self) -> Vec<StockLine> {
        inventory::stock_summary(&self.stock, self.roster.attendees())
    }

    pub fn metrics(&self) -> RosterMetrics {
        self.roster.metrics()
    }

    /// Append to the activity log as the current operator
    pub fn record(&mut self, message: impl Into<String>) {
        self.activity.record(&self.operator.name, message);
    }
}
