use serde::{Deserialize, Serialize};

use super::attendee::{Attendee, Role};

/// Seats on a bus reserved away from one role.
///
/// At most `limit` riders of `role` may sit on the bus; the remaining
/// seats stay open for everyone else (typically staff).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    pub role: Role,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub role_quota: Option<RoleQuota>,
}

impl Bus {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            role_quota: None,
        }
    }

    /// Attach a role quota; limits above capacity clamp to capacity
    pub fn with_quota(mut self, role: Role, limit: u32) -> Self {
        self.role_quota = Some(RoleQuota {
            role,
            limit: limit.min(self.capacity),
        });
        self
    }

    /// The quota that applies to a rider of `role`, if any
    pub fn quota_for(&self, role: &Role) -> Option<&RoleQuota> {
        self.role_quota.as_ref().filter(|q| &q.role == role)
    }
}

/// The ordered set of buses for the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    pub buses: Vec<Bus>,
}

impl Fleet {
    pub fn new(buses: Vec<Bus>) -> Self {
        Self { buses }
    }

    /// Buses sharing one capacity and optional role quota
    pub fn uniform<I, S>(names: I, capacity: u32, quota: Option<RoleQuota>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let buses = names
            .into_iter()
            .map(|name| {
                let bus = Bus::new(name, capacity);
                match &quota {
                    Some(q) => bus.with_quota(q.role.clone(), q.limit),
                    None => bus,
                }
            })
            .collect();
        Self { buses }
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.buses.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.buses.iter().position(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Bus> {
        self.buses.iter().find(|b| b.name == name)
    }

    pub fn total_capacity(&self) -> u32 {
        self.buses.iter().map(|b| b.capacity).sum()
    }

    /// Occupancy of every bus, derived from the roster
    pub fn loads(&self, attendees: &[Attendee]) -> FleetLoad {
        let mut loads: Vec<BusLoad> = self.buses.iter().map(BusLoad::empty).collect();
        let mut unassigned = 0;
        let mut off_fleet = 0;

        for attendee in attendees {
            match attendee.bus.bus_name() {
                None => unassigned += 1,
                Some(name) => match self.index_of(name) {
                    Some(i) => loads[i].add_rider(&attendee.role),
                    None => off_fleet += 1,
                },
            }
        }

        FleetLoad {
            loads,
            unassigned,
            off_fleet,
        }
    }
}

/// Occupancy snapshot of one bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusLoad {
    pub name: String,
    pub capacity: u32,
    pub occupancy: u32,
    pub quota: Option<RoleQuota>,
    /// Riders counted against the quota role
    pub quota_count: u32,
}

impl BusLoad {
    pub fn empty(bus: &Bus) -> Self {
        Self {
            name: bus.name.clone(),
            capacity: bus.capacity,
            occupancy: 0,
            quota: bus.role_quota.clone(),
            quota_count: 0,
        }
    }

    pub fn add_rider(&mut self, role: &Role) {
        self.occupancy += 1;
        if self.quota.as_ref().is_some_and(|q| &q.role == role) {
            self.quota_count += 1;
        }
    }

    pub fn free_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.occupancy)
    }

    pub fn is_full(&self) -> bool {
        self.occupancy >= self.capacity
    }

    /// Whether one more rider of `role` fits, both by seats and by quota
    pub fn has_room_for(&self, role: &Role) -> bool {
        if self.is_full() {
            return false;
        }
        match &self.quota {
            Some(q) if &q.role == role => self.quota_count < q.limit,
            _ => true,
        }
    }

    /// Fill ratio for progress gauges, capped at 1.0
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            1.0
        } else {
            (self.occupancy as f64 / self.capacity as f64).min(1.0)
        }
    }
}

/// Occupancy of the whole fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetLoad {
    pub loads: Vec<BusLoad>,
    /// Attendees with no bus
    pub unassigned: usize,
    /// Attendees on a bus name the fleet does not know
    pub off_fleet: usize,
}

impl FleetLoad {
    pub fn seated(&self) -> u32 {
        self.loads.iter().map(|l| l.occupancy).sum()
    }

    pub fn free_seats(&self) -> u32 {
        self.loads.iter().map(|l| l.free_seats()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider(ticket: &str, role: Role, bus: &str) -> Attendee {
        Attendee::new(format!("Rider {}", ticket), ticket, role).with_bus(bus)
    }

    fn student_quota(limit: u32) -> Option<RoleQuota> {
        Some(RoleQuota {
            role: Role::Student,
            limit,
        })
    }

    #[test]
    fn test_quota_clamps_to_capacity() {
        let bus = Bus::new("Bus 1", 10).with_quota(Role::Student, 50);
        assert_eq!(bus.role_quota.unwrap().limit, 10);
    }

    #[test]
    fn test_uniform_fleet() {
        let fleet = Fleet::uniform(["Bus 1", "Bus 2"], 45, student_quota(43));
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.total_capacity(), 90);
        assert_eq!(fleet.index_of("Bus 2"), Some(1));
        let second = fleet.get("Bus 2").unwrap();
        assert!(second.quota_for(&Role::Student).is_some());
        assert!(second.quota_for(&Role::Teacher).is_none());
    }

    #[test]
    fn test_loads_count_riders_and_strays() {
        let fleet = Fleet::uniform(["Bus 1", "Bus 2"], 3, student_quota(2));
        let roster = vec![
            rider("1", Role::Student, "Bus 1"),
            rider("2", Role::Teacher, "Bus 1"),
            rider("3", Role::Student, "Bus 2"),
            rider("4", Role::Student, "Bus 9"),
            Attendee::new("Walker", "5", Role::Guest),
        ];
        let fleet_load = fleet.loads(&roster);
        assert_eq!(fleet_load.loads[0].occupancy, 2);
        assert_eq!(fleet_load.loads[0].quota_count, 1);
        assert_eq!(fleet_load.loads[1].occupancy, 1);
        assert_eq!(fleet_load.unassigned, 1);
        assert_eq!(fleet_load.off_fleet, 1);
        assert_eq!(fleet_load.seated(), 3);
        assert_eq!(fleet_load.free_seats(), 3);
    }

    #[test]
    fn test_has_room_for_respects_quota() {
        let bus = Bus::new("Bus 1", 3).with_quota(Role::Student, 2);
        let mut load = BusLoad::empty(&bus);
        load.add_rider(&Role::Student);
        load.add_rider(&Role::Student);
        assert!(!load.has_room_for(&Role::Student));
        assert!(load.has_room_for(&Role::Teacher));
        load.add_rider(&Role::Teacher);
        assert!(load.is_full());
        assert!(!load.has_room_for(&Role::Teacher));
        assert_eq!(load.fill_ratio(), 1.0);
    }
}
