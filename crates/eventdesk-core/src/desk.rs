//! Desk handlers.
//!
//! `EventDesk` owns the `EventContext` and a `RosterStore`. Every handler
//! checks access, changes the context, appends to the activity log and
//! persists. Front-ends call these handlers and never change the roster
//! themselves.
//!
//! When a save fails the in-memory state is kept and the storage error is
//! returned. The next successful save rewrites every table.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::activity::ActivityLog;
use crate::auth::{Access, Operator};
use crate::context::EventContext;
use crate::error::{DeskError, DeskResult};
use crate::inventory::{self, StockLine};
use crate::models::{Attendee, BusAssignment, Fleet, FleetLoad, ShirtSize, StockLedger};
use crate::roster::{ImportReport, Roster, RosterMetrics, ENTRY_TIME_FORMAT};
use crate::seating::{
    apply_plan, assign_seats, select_candidates, AssignOptions, CandidateFilter, SeatPlan,
};
use crate::store::{RosterStore, Saved};

/// Operator name recorded for attendee self-service
const PORTAL_OPERATOR: &str = "Portal";

/// What an attendee sees when looking up their own ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentPass {
    pub name: String,
    pub ticket_number: String,
    pub role: String,
    pub class_group: String,
    pub bus: String,
    pub entered: bool,
    pub entry_time: Option<String>,
    pub shirt: String,
}

impl StudentPass {
    fn from_attendee(a: &Attendee) -> Self {
        Self {
            name: a.display_name(),
            ticket_number: a.ticket_number.clone(),
            role: a.role.label().to_string(),
            class_group: a.class_display().to_string(),
            bus: a.bus.to_string(),
            entered: a.checked_in,
            entry_time: a.entry_time.clone(),
            shirt: a.shirt_label(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let status = match (self.entered, &self.entry_time) {
            (true, Some(time)) => format!("CHECKED-IN at {}", time),
            (true, None) => "CHECKED-IN".to_string(),
            (false, _) => "NOT ENTERED".to_string(),
        };
        vec![
            format!("Name:    {}", self.name),
            format!("Ticket:  {}", self.ticket_number),
            format!("Role:    {}", self.role),
            format!("Class:   {}", self.class_group),
            format!("Bus:     {}", self.bus),
            format!("Status:  {}", status),
            format!("T-Shirt: {}", self.shirt),
        ]
    }
}

pub struct EventDesk<S: RosterStore> {
    ctx: EventContext,
    store: S,
    roster_saved_at: Option<DateTime<Utc>>,
    needs_full_save: bool,
}

impl<S: RosterStore> EventDesk<S> {
    /// Load every table from `store`. Unreadable tables start empty so the
    /// desk can always come up.
    pub fn open(store: S, fleet: Fleet, operator: Operator) -> Self {
        let mut ctx = EventContext::new(fleet, operator);
        let mut roster_saved_at = None;

        match store.load_roster() {
            Ok(Some(saved)) => {
                debug!(rows = saved.data.len(), "Loaded roster");
                roster_saved_at = Some(saved.saved_at);
                ctx.roster = Roster::new(saved.data);
            }
            Ok(None) => debug!("No saved roster"),
            Err(e) => warn!(error = %format!("{:#}", e), "Could not load roster, starting empty"),
        }

        match store.load_stock() {
            Ok(Some(saved)) => ctx.stock = saved.data,
            Ok(None) => debug!("No saved stock"),
            Err(e) => warn!(error = %format!("{:#}", e), "Could not load stock, starting at zero"),
        }

        match store.load_activity() {
            Ok(Some(saved)) => ctx.activity = saved.data,
            Ok(None) => {}
            Err(e) => warn!(error = %format!("{:#}", e), "Could not load activity log"),
        }

        let loads = ctx.loads();
        if loads.off_fleet > 0 {
            warn!(
                count = loads.off_fleet,
                "Attendees assigned to buses outside the fleet"
            );
        }

        Self {
            ctx,
            store,
            roster_saved_at,
            needs_full_save: false,
        }
    }

    pub fn context(&self) -> &EventContext {
        &self.ctx
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn operator(&self) -> &Operator {
        &self.ctx.operator
    }

    pub fn set_operator(&mut self, operator: Operator) {
        info!(operator = %operator.name, access = %operator.access, "Operator signed in");
        self.ctx.operator = operator;
    }

    pub fn roster(&self) -> &Roster {
        &self.ctx.roster
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.ctx.activity
    }

    /// "5m ago" style age of the last roster save
    pub fn roster_age(&self) -> Option<String> {
        let saved_at = self.roster_saved_at?;
        Some(Saved { data: (), saved_at }.age_display())
    }

    /// A previous save failed and state on disk is behind
    pub fn has_unsaved_changes(&self) -> bool {
        self.needs_full_save
    }

    fn persist(&mut self, roster: bool, stock: bool) -> DeskResult<()> {
        let full = self.needs_full_save;
        let result = save_tables(&mut self.store, &self.ctx, roster || full, stock || full);
        match result {
            Ok(()) => {
                if roster || full {
                    self.roster_saved_at = Some(Utc::now());
                }
                self.needs_full_save = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Save failed, keeping changes in memory");
                self.needs_full_save = true;
                Err(DeskError::storage(e))
            }
        }
    }

    /// Retry saving everything
    pub fn save_all(&mut self) -> DeskResult<()> {
        self.needs_full_save = true;
        self.persist(true, true)
    }

    // ===== Entry =====

    /// Mark an attendee as entered now
    pub fn check_in(&mut self, ticket: &str) -> DeskResult<Attendee> {
        let time = Local::now().format(ENTRY_TIME_FORMAT).to_string();
        let attendee = self.ctx.roster.check_in(ticket, &time)?.clone();
        info!(ticket = %attendee.ticket_number, time = %time, "Checked in");
        self.ctx.record(format!(
            "Entry: {} ({})",
            attendee.display_name(),
            attendee.ticket_number
        ));
        self.persist(true, false)?;
        Ok(attendee)
    }

    pub fn undo_check_in(&mut self, ticket: &str) -> DeskResult<()> {
        self.ctx.operator.require(Access::Admin)?;
        let name = self.ctx.roster.undo_check_in(ticket)?.display_name();
        info!(ticket = ticket.trim(), "Check-in undone");
        self.ctx.record(format!("Entry undone: {}", name));
        self.persist(true, false)
    }

    // ===== Kits and meals =====

    /// Hand out or take back a T-shirt kit. Returns the new flag.
    pub fn toggle_kit(&mut self, ticket: &str) -> DeskResult<bool> {
        let given = inventory::toggle_kit(&mut self.ctx.roster, &self.ctx.stock, ticket)?;
        let attendee = self.ctx.roster.get(ticket)?;
        let message = format!(
            "Kit {}: {} ({})",
            if given { "given" } else { "returned" },
            attendee.display_name(),
            attendee.shirt_size.map(|s| s.label()).unwrap_or("-")
        );
        info!(ticket = ticket.trim(), given, "Kit toggled");
        self.ctx.record(message);
        self.persist(true, false)?;
        Ok(given)
    }

    pub fn toggle_food(&mut self, ticket: &str) -> DeskResult<bool> {
        let served = self.ctx.roster.toggle_food(ticket)?;
        let name = self.ctx.roster.get(ticket)?.display_name();
        info!(ticket = ticket.trim(), served, "Meal toggled");
        self.ctx.record(format!(
            "Meal {}: {}",
            if served { "served" } else { "cleared" },
            name
        ));
        self.persist(true, false)?;
        Ok(served)
    }

    pub fn set_note(&mut self, ticket: &str, note: &str) -> DeskResult<()> {
        self.ctx.roster.set_note(ticket, note)?;
        let name = self.ctx.roster.get(ticket)?.display_name();
        self.ctx.record(format!("Note updated: {}", name));
        self.persist(true, false)
    }

    // ===== Registration =====

    pub fn add_attendee(&mut self, attendee: Attendee) -> DeskResult<()> {
        let label = format!(
            "{} ({})",
            attendee.display_name(),
            attendee.ticket_number.trim()
        );
        self.ctx.roster.add(attendee)?;
        info!(attendee = %label, "Attendee added");
        self.ctx.record(format!("Registered: {}", label));
        self.persist(true, false)
    }

    pub fn import(&mut self, rows: Vec<Attendee>) -> DeskResult<ImportReport> {
        let report = self.ctx.roster.import(rows);
        info!(
            added = report.added,
            skipped = report.skipped,
            "Roster import"
        );
        if report.added > 0 {
            self.ctx.record(format!(
                "Imported {} attendees ({} skipped)",
                report.added, report.skipped
            ));
            self.persist(true, false)?;
        }
        Ok(report)
    }

    // ===== Transport =====

    /// Plan an assignment without changing anything
    pub fn preview_assignment(
        &self,
        filter: &CandidateFilter,
        options: &AssignOptions,
    ) -> SeatPlan {
        let candidates = select_candidates(self.ctx.roster.attendees(), filter);
        let loads = self.ctx.loads();
        assign_seats(&candidates, &loads.loads, options)
    }

    /// Seat every unassigned attendee matching `filter`
    pub fn auto_assign(
        &mut self,
        filter: &CandidateFilter,
        options: &AssignOptions,
    ) -> DeskResult<SeatPlan> {
        let plan = self.preview_assignment(filter, options);
        info!(
            filter = %filter,
            assigned = plan.assigned_count(),
            unassigned = plan.unassigned_count(),
            "Auto assignment"
        );
        if plan.unassigned_count() > 0 {
            warn!(count = plan.unassigned_count(), filter = %filter, "Not enough seats");
        }
        if plan.assigned_count() == 0 {
            return Ok(plan);
        }

        apply_plan(self.ctx.roster.attendees_mut(), &plan);
        let start = self
            .ctx
            .fleet
            .buses
            .get(options.start_bus)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        let message = format!("Auto-assign {} from {}: {}", filter, start, plan.summary());
        self.ctx.record(message);
        self.persist(true, false)?;
        Ok(plan)
    }

    /// Seat one attendee on a named bus, honoring capacity and quota
    pub fn move_to_bus(&mut self, ticket: &str, bus: &str) -> DeskResult<()> {
        let index = self
            .ctx
            .fleet
            .index_of(bus.trim())
            .ok_or_else(|| DeskError::UnknownBus(bus.trim().to_string()))?;
        let attendee = self.ctx.roster.get(ticket)?;
        let bus_name = self.ctx.fleet.buses[index].name.clone();
        if attendee.bus.is_on(&bus_name) {
            return Ok(());
        }
        let role = attendee.role.clone();
        let name = attendee.display_name();

        let loads = self.ctx.loads();
        let load = &loads.loads[index];
        if load.is_full() {
            return Err(DeskError::BusFull {
                bus: bus_name,
                capacity: load.capacity,
            });
        }
        if !load.has_room_for(&role) {
            let limit = load.quota.as_ref().map(|q| q.limit).unwrap_or(0);
            return Err(DeskError::QuotaFull {
                bus: bus_name,
                role: role.label().to_string(),
                limit,
            });
        }

        self.ctx
            .roster
            .set_bus(ticket, BusAssignment::Bus(bus_name.clone()))?;
        info!(ticket = ticket.trim(), bus = %bus_name, "Moved to bus");
        self.ctx.record(format!("Bus: {} -> {}", name, bus_name));
        self.persist(true, false)
    }

    pub fn unassign(&mut self, ticket: &str) -> DeskResult<()> {
        let attendee = self.ctx.roster.get(ticket)?;
        if !attendee.bus.is_assigned() {
            return Ok(());
        }
        let name = attendee.display_name();
        self.ctx.roster.set_bus(ticket, BusAssignment::Unassigned)?;
        self.ctx.record(format!("Bus cleared: {}", name));
        self.persist(true, false)
    }

    /// Clear bus assignments, for everyone or only those matching `filter`
    pub fn reset_buses(&mut self, filter: Option<&CandidateFilter>) -> DeskResult<usize> {
        self.ctx.operator.require(Access::Admin)?;
        let cleared = self
            .ctx
            .roster
            .clear_buses(|a| filter.is_none_or(|f| f.matches(a)));
        info!(cleared, "Bus assignments reset");
        if cleared > 0 {
            let scope = filter
                .map(|f| f.to_string())
                .unwrap_or_else(|| "everyone".to_string());
            let message = format!("Buses reset for {}: {} cleared", scope, cleared);
            self.ctx.record(message);
            self.persist(true, false)?;
        }
        Ok(cleared)
    }

    pub fn loads(&self) -> FleetLoad {
        self.ctx.loads()
    }

    // ===== Inventory =====

    pub fn set_stock(&mut self, size: ShirtSize, quantity: u32) -> DeskResult<()> {
        self.ctx.operator.require(Access::Admin)?;
        self.ctx.stock.set_total(size, quantity);
        let collected = inventory::collected(self.ctx.roster.attendees(), size);
        if collected > quantity {
            warn!(size = %size, quantity, collected, "Stock set below kits already handed out");
        }
        info!(size = %size, quantity, "Stock updated");
        let message = format!("Stock for {} set to {}", size, quantity);
        self.ctx.record(message);
        self.persist(false, true)
    }

    pub fn stock(&self) -> &StockLedger {
        &self.ctx.stock
    }

    pub fn stock_summary(&self) -> Vec<StockLine> {
        self.ctx.stock_summary()
    }

    // ===== Dashboard =====

    pub fn metrics(&self) -> RosterMetrics {
        self.ctx.metrics()
    }

    pub fn clear_activity(&mut self) -> DeskResult<()> {
        self.ctx.operator.require(Access::Admin)?;
        self.ctx.activity.clear();
        info!("Activity log cleared");
        self.ctx.record("Activity log cleared");
        self.persist(false, false)
    }

    // ===== Portal =====

    pub fn portal_pass(&self, ticket: &str) -> DeskResult<StudentPass> {
        Ok(StudentPass::from_attendee(self.ctx.roster.get(ticket)?))
    }

    /// Store a complaint submitted by the attendee
    pub fn report_fault(&mut self, ticket: &str, report: &str) -> DeskResult<()> {
        self.ctx.roster.report_fault(ticket, report)?;
        let name = self.ctx.roster.get(ticket)?.display_name();
        info!(ticket = ticket.trim(), "Fault report received");
        self.ctx
            .activity
            .record(PORTAL_OPERATOR, format!("Fault report from {}", name));
        self.persist(true, false)
    }
}

fn save_tables<S: RosterStore>(
    store: &mut S,
    ctx: &EventContext,
    roster: bool,
    stock: bool,
) -> anyhow::Result<()> {
    if roster {
        store.save_roster(ctx.roster.attendees())?;
    }
    if stock {
        store.save_stock(&ctx.stock)?;
    }
    store.save_activity(&ctx.activity)?;
    Ok(())
}
