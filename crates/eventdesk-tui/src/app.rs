//! Application state management for EventDesk.
//!
//! This module contains the `App` struct that holds the desk, the UI state
//! of every tab and the login form. All roster changes go through the
//! `EventDesk` handlers.

use tracing::{info, warn};

use eventdesk_core::auth::{Access, Operator, Passcodes};
use eventdesk_core::models::{Attendee, ShirtSize};
use eventdesk_core::seating::{
    group_options, AssignOptions, CandidateFilter, CandidateOrder, GroupField, OverflowPolicy,
    SeatPlan,
};
use eventdesk_core::store::JsonStore;
use eventdesk_core::{Config, DeskError, DeskResult, EventDesk};

// ============================================================================
// Constants
// ============================================================================

const MAX_OPERATOR_LENGTH: usize = 32;

const MAX_PASSCODE_LENGTH: usize = 64;

const MAX_SEARCH_LENGTH: usize = 64;

const MAX_NOTE_LENGTH: usize = 200;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Check-ins listed on the dashboard
pub const RECENT_CHECK_INS: usize = 8;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Terminal,
    Transport,
    Inventory,
    Dashboard,
    Activity,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Terminal,
        Tab::Transport,
        Tab::Inventory,
        Tab::Dashboard,
        Tab::Activity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Terminal => "Terminal",
            Tab::Transport => "Transport",
            Tab::Inventory => "Inventory",
            Tab::Dashboard => "Dashboard",
            Tab::Activity => "Activity",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Terminal => Tab::Transport,
            Tab::Transport => Tab::Inventory,
            Tab::Inventory => Tab::Dashboard,
            Tab::Dashboard => Tab::Activity,
            Tab::Activity => Tab::Terminal,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Terminal => Tab::Activity,
            Tab::Transport => Tab::Terminal,
            Tab::Inventory => Tab::Transport,
            Tab::Dashboard => Tab::Inventory,
            Tab::Activity => Tab::Dashboard,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    EditingNote,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Operator,
    Passcode,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Operator => LoginFocus::Passcode,
            LoginFocus::Passcode => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Operator,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Operator => LoginFocus::Button,
            LoginFocus::Passcode => LoginFocus::Operator,
            LoginFocus::Button => LoginFocus::Passcode,
        }
    }
}

/// Settings for bulk seating on the Transport tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPanel {
    pub group_field: GroupField,
    pub group_selection: usize,
    pub start_bus: usize,
    /// Lottery seating with this seed
    pub seed: Option<u64>,
    pub stop_when_full: bool,
    pub bus_selection: usize,
    /// Result of the last preview or run
    pub last_plan: Option<SeatPlan>,
}

impl Default for TransportPanel {
    fn default() -> Self {
        Self {
            group_field: GroupField::Role,
            group_selection: 0,
            start_bus: 0,
            seed: None,
            stop_when_full: false,
            bus_selection: 0,
            last_plan: None,
        }
    }
}

impl TransportPanel {
    pub fn options(&self) -> AssignOptions {
        AssignOptions {
            start_bus: self.start_bus,
            overflow: if self.stop_when_full {
                OverflowPolicy::Stop
            } else {
                OverflowPolicy::Continue
            },
            order: match self.seed {
                Some(seed) => CandidateOrder::Shuffled { seed },
                None => CandidateOrder::InRosterOrder,
            },
        }
    }

    /// Filter for the selected group, if the roster has any groups
    pub fn filter(&self, attendees: &[Attendee]) -> Option<CandidateFilter> {
        group_options(attendees, self.group_field)
            .get(self.group_selection)
            .map(|value| self.group_field.filter_for(value))
    }

    pub fn toggle_group_field(&mut self) {
        self.group_field = self.group_field.toggle();
        self.group_selection = 0;
        self.last_plan = None;
    }

    pub fn cycle_start_bus(&mut self, fleet_len: usize, forward: bool) {
        if fleet_len == 0 {
            return;
        }
        self.start_bus = if forward {
            (self.start_bus + 1) % fleet_len
        } else {
            (self.start_bus + fleet_len - 1) % fleet_len
        };
        self.last_plan = None;
    }

    /// Turn lottery seating on with a fresh seed, or off
    pub fn toggle_lottery(&mut self, seed: u64) {
        self.seed = match self.seed {
            Some(_) => None,
            None => Some(seed),
        };
        self.last_plan = None;
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub desk: EventDesk<JsonStore>,
    pub config: Config,
    passcodes: Passcodes,

    pub state: AppState,
    pub current_tab: Tab,
    pub status_message: Option<String>,

    // Login form
    pub login_operator: String,
    pub login_passcode: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Terminal tab
    pub search_query: String,
    pub terminal_selection: usize,
    pub note_input: String,

    // Transport tab
    pub transport: TransportPanel,

    // Inventory tab
    pub stock_selection: usize,

    // Activity tab
    pub activity_scroll: usize,
}

impl App {
    pub fn new(desk: EventDesk<JsonStore>, config: Config) -> Self {
        let passcodes = config.passcodes();
        let login_operator = config.operator();
        Self {
            desk,
            config,
            passcodes,
            state: AppState::Normal,
            current_tab: Tab::Terminal,
            status_message: None,
            login_operator,
            login_passcode: String::new(),
            login_focus: LoginFocus::Passcode,
            login_error: None,
            search_query: String::new(),
            terminal_selection: 0,
            note_input: String::new(),
            transport: TransportPanel::default(),
            stock_selection: 0,
            activity_scroll: 0,
        }
    }

    /// Ask for a passcode, or open the desk when none is configured
    pub fn start_login(&mut self) {
        if self.passcodes.is_open() {
            warn!("No desk passcodes configured");
            let name = self.login_operator.trim().to_string();
            self.desk.set_operator(Operator::new(name, Access::Admin));
            self.status_message =
                Some("No passcodes set: desk is open (run --set-passcode)".to_string());
            self.state = AppState::Normal;
            return;
        }
        self.login_passcode.clear();
        self.login_error = None;
        self.login_focus = LoginFocus::Passcode;
        self.state = AppState::LoggingIn;
    }

    pub fn attempt_login(&mut self) {
        let name = self.login_operator.trim().to_string();
        if name.is_empty() {
            self.login_error = Some("Operator name required".to_string());
            return;
        }

        match self.passcodes.authenticate(&self.login_passcode) {
            Some(access) => {
                info!(operator = %name, access = %access, "Login succeeded");
                self.desk.set_operator(Operator::new(name.clone(), access));
                self.login_passcode.clear();
                self.login_error = None;
                self.state = AppState::Normal;
                self.status_message = Some(format!("Signed in as {} ({})", name, access));
            }
            None => {
                warn!(operator = %name, "Login failed");
                self.login_passcode.clear();
                self.login_error = Some("Invalid passcode".to_string());
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.desk.operator().access == Access::Admin
    }

    /// Show the outcome of a handler in the status bar
    pub fn report<T>(&mut self, result: DeskResult<T>, success: impl FnOnce(&T) -> String) {
        self.status_message = Some(match result {
            Ok(value) => success(&value),
            Err(e) => describe_error(&e),
        });
    }

    // ===== Terminal =====

    pub fn search_results(&self) -> Vec<&Attendee> {
        self.desk.roster().search(&self.search_query)
    }

    pub fn selected_ticket(&self) -> Option<String> {
        self.search_results()
            .get(self.terminal_selection)
            .map(|a| a.ticket_number.clone())
    }

    pub fn check_in_selected(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let result = self.desk.check_in(&ticket);
            self.report(result, |a| {
                format!(
                    "{} checked in at {}",
                    a.display_name(),
                    a.entry_time.as_deref().unwrap_or("-")
                )
            });
        }
    }

    pub fn undo_check_in_selected(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let result = self.desk.undo_check_in(&ticket);
            self.report(result, |_| "Check-in undone".to_string());
        }
    }

    pub fn toggle_kit_selected(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let result = self.desk.toggle_kit(&ticket);
            self.report(result, |given| match given {
                true => "Kit handed out".to_string(),
                false => "Kit taken back".to_string(),
            });
        }
    }

    pub fn toggle_food_selected(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let result = self.desk.toggle_food(&ticket);
            self.report(result, |served| match served {
                true => "Meal served".to_string(),
                false => "Meal cleared".to_string(),
            });
        }
    }

    /// Move the selected attendee to the next bus in the fleet
    pub fn cycle_bus_selected(&mut self) {
        let Some(ticket) = self.selected_ticket() else {
            return;
        };
        let fleet = &self.desk.context().fleet;
        if fleet.is_empty() {
            return;
        }
        let current = self
            .desk
            .roster()
            .find(&ticket)
            .and_then(|a| a.bus.bus_name())
            .and_then(|name| fleet.index_of(name));
        let next = match current {
            Some(i) => (i + 1) % fleet.len(),
            None => 0,
        };
        let bus = fleet.buses[next].name.clone();
        let result = self.desk.move_to_bus(&ticket, &bus);
        self.report(result, |_| format!("Moved to {}", bus));
    }

    pub fn unassign_selected(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let result = self.desk.unassign(&ticket);
            self.report(result, |_| "Bus cleared".to_string());
        }
    }

    pub fn start_note_edit(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            self.note_input = self
                .desk
                .roster()
                .find(&ticket)
                .map(|a| a.notes.clone())
                .unwrap_or_default();
            self.state = AppState::EditingNote;
        }
    }

    pub fn save_note(&mut self) {
        if let Some(ticket) = self.selected_ticket() {
            let note = self.note_input.clone();
            let result = self.desk.set_note(&ticket, &note);
            self.report(result, |_| "Note saved".to_string());
        }
        self.note_input.clear();
        self.state = AppState::Normal;
    }

    // ===== Transport =====

    pub fn preview_assignment(&mut self) {
        let Some(filter) = self.transport.filter(self.desk.roster().attendees()) else {
            self.status_message = Some("No groups to assign".to_string());
            return;
        };
        let options = self.transport.options();
        let plan = self.desk.preview_assignment(&filter, &options);
        self.status_message = Some(format!("Preview for {}: {}", filter, plan.summary()));
        self.transport.last_plan = Some(plan);
    }

    pub fn run_assignment(&mut self) {
        let Some(filter) = self.transport.filter(self.desk.roster().attendees()) else {
            self.status_message = Some("No groups to assign".to_string());
            return;
        };
        let options = self.transport.options();
        match self.desk.auto_assign(&filter, &options) {
            Ok(plan) => {
                self.status_message = Some(plan.summary());
                self.transport.last_plan = Some(plan);
            }
            Err(e) => {
                self.status_message = Some(describe_error(&e));
                self.transport.last_plan = None;
            }
        }
    }

    pub fn reset_selected_group(&mut self) {
        let filter = self.transport.filter(self.desk.roster().attendees());
        let result = self.desk.reset_buses(filter.as_ref());
        self.transport.last_plan = None;
        self.report(result, |n| format!("Cleared {} bus assignments", n));
    }

    // ===== Inventory =====

    pub fn selected_size(&self) -> ShirtSize {
        ShirtSize::ALL[self.stock_selection.min(ShirtSize::ALL.len() - 1)]
    }

    pub fn adjust_stock(&mut self, delta: i64) {
        let size = self.selected_size();
        let current = self.desk.stock().total_ordered(size) as i64;
        let quantity = (current + delta).clamp(0, u32::MAX as i64) as u32;
        let result = self.desk.set_stock(size, quantity);
        let message = format!("Stock for {} set to {}", size, quantity);
        self.report(result, |_| message);
    }

    // ===== Activity =====

    pub fn clear_activity(&mut self) {
        let result = self.desk.clear_activity();
        self.activity_scroll = 0;
        self.report(result, |_| "Activity log cleared".to_string());
    }
}

/// Status bar text for a failed handler
pub fn describe_error(err: &DeskError) -> String {
    if err.is_storage() {
        format!("Not saved, change kept in memory: {}", err)
    } else {
        err.to_string()
    }
}

// ============================================================================
// Input Validation
// ============================================================================

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_operator_char(current_len: usize, c: char) -> bool {
    current_len < MAX_OPERATOR_LENGTH && is_valid_input_char(c)
}

pub fn can_add_passcode_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSCODE_LENGTH && is_valid_input_char(c)
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

pub fn can_add_note_char(current_len: usize, c: char) -> bool {
    current_len < MAX_NOTE_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
