use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cell;
use super::stock::{de_opt_size, ser_opt_size, ShirtSize};
use crate::utils::format_phone;

/// Attendee role as recorded at registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Role {
    Student,
    Volunteer,
    Teacher,
    Organizer,
    #[default]
    Guest,
    Other(String),
}

impl Role {
    /// Parse a role cell. Case-insensitive; anything unrecognized is kept as `Other`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "student" => Role::Student,
            "volunteer" => Role::Volunteer,
            "teacher" => Role::Teacher,
            "organizer" | "organiser" => Role::Organizer,
            "guest" | "" => Role::Guest,
            _ => Role::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Student => "Student",
            Role::Volunteer => "Volunteer",
            Role::Teacher => "Teacher",
            Role::Organizer => "Organizer",
            Role::Guest => "Guest",
            Role::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Role::parse(&cell::de_text(deserializer)?))
    }
}

/// Which bus an attendee rides, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BusAssignment {
    #[default]
    Unassigned,
    Bus(String),
}

/// Sheet spelling of an empty bus cell
pub const UNASSIGNED_LABEL: &str = "Unassigned";

impl BusAssignment {
    pub fn parse(s: &str) -> Self {
        let cleaned = cell::clean(s);
        if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(UNASSIGNED_LABEL) {
            BusAssignment::Unassigned
        } else {
            BusAssignment::Bus(cleaned)
        }
    }

    pub fn bus_name(&self) -> Option<&str> {
        match self {
            BusAssignment::Unassigned => None,
            BusAssignment::Bus(name) => Some(name),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, BusAssignment::Bus(_))
    }

    pub fn is_on(&self, bus: &str) -> bool {
        self.bus_name() == Some(bus)
    }
}

impl fmt::Display for BusAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bus_name().unwrap_or(UNASSIGNED_LABEL))
    }
}

impl Serialize for BusAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.bus_name().unwrap_or(UNASSIGNED_LABEL))
    }
}

impl<'de> Deserialize<'de> for BusAssignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(BusAssignment::parse(&cell::de_text(deserializer)?))
    }
}

/// One row of the event roster.
///
/// Field names follow the columns of the registration sheet. Every column is
/// optional on load; see `cell` for how stray values are normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(rename = "Name", default, deserialize_with = "cell::de_text")]
    pub name: String,
    #[serde(rename = "Role", default)]
    pub role: Role,
    #[serde(rename = "Spot Phone", default, deserialize_with = "cell::de_text")]
    pub phone: String,
    #[serde(rename = "Guardian Phone", default, deserialize_with = "cell::de_text")]
    pub guardian_phone: String,
    #[serde(rename = "Ticket_Number", default, deserialize_with = "cell::de_text")]
    pub ticket_number: String,
    #[serde(rename = "Class", default, deserialize_with = "cell::de_text")]
    pub class_group: String,
    #[serde(rename = "Roll", default, deserialize_with = "cell::de_text")]
    pub roll: String,
    #[serde(
        rename = "Entry_Status",
        default,
        deserialize_with = "cell::de_flag",
        serialize_with = "cell::ser_entry_flag"
    )]
    pub checked_in: bool,
    #[serde(rename = "Entry_Time", default, deserialize_with = "cell::de_opt_text")]
    pub entry_time: Option<String>,
    #[serde(rename = "Bus_Number", default)]
    pub bus: BusAssignment,
    #[serde(
        rename = "T_Shirt_Size",
        default,
        deserialize_with = "de_opt_size",
        serialize_with = "ser_opt_size"
    )]
    pub shirt_size: Option<ShirtSize>,
    #[serde(
        rename = "T_Shirt_Collected",
        default,
        deserialize_with = "cell::de_flag",
        serialize_with = "cell::ser_yes_no"
    )]
    pub shirt_collected: bool,
    #[serde(
        rename = "Food_Collected",
        default,
        deserialize_with = "cell::de_flag",
        serialize_with = "cell::ser_yes_no"
    )]
    pub food_collected: bool,
    #[serde(rename = "Notes", default, deserialize_with = "cell::de_text")]
    pub notes: String,
    #[serde(rename = "Fault_Report", default, deserialize_with = "cell::de_text")]
    pub fault_report: String,
}

impl Attendee {
    /// A freshly registered attendee: not checked in, no bus, no kit
    pub fn new(name: impl Into<String>, ticket_number: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            phone: String::new(),
            guardian_phone: String::new(),
            ticket_number: ticket_number.into(),
            class_group: String::new(),
            roll: String::new(),
            checked_in: false,
            entry_time: None,
            bus: BusAssignment::Unassigned,
            shirt_size: None,
            shirt_collected: false,
            food_collected: false,
            notes: String::new(),
            fault_report: String::new(),
        }
    }

    pub fn with_class(mut self, class_group: impl Into<String>) -> Self {
        self.class_group = class_group.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_shirt(mut self, size: ShirtSize) -> Self {
        self.shirt_size = Some(size);
        self
    }

    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = BusAssignment::Bus(bus.into());
        self
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("(ticket {})", self.ticket_number)
        } else {
            self.name.clone()
        }
    }

    pub fn phone_display(&self) -> String {
        if self.phone.is_empty() {
            "-".to_string()
        } else {
            format_phone(&self.phone)
        }
    }

    pub fn class_display(&self) -> &str {
        if self.class_group.is_empty() {
            "-"
        } else {
            &self.class_group
        }
    }

    pub fn entry_label(&self) -> &'static str {
        if self.checked_in {
            "CHECKED-IN"
        } else {
            "NOT ENTERED"
        }
    }

    pub fn shirt_label(&self) -> String {
        let size = self.shirt_size.map(|s| s.label()).unwrap_or("-");
        let given = if self.shirt_collected {
            "given"
        } else {
            "pending"
        };
        format!("{} ({})", size, given)
    }
}
