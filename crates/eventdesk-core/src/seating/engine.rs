//! Greedy seat assignment across an ordered fleet.
//!
//! Candidates are placed in order on the first bus at or after a moving
//! pointer that still has room for them. The pointer only moves forward,
//! and only past buses that are out of seats; a bus skipped because a role
//! quota is exhausted stays open to riders of other roles.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use crate::models::{BusLoad, Role};

/// Someone waiting for a seat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCandidate {
    /// Roster identity (ticket number)
    pub id: String,
    pub role: Role,
}

impl SeatCandidate {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// What to do once a candidate finds no bus with room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Report the candidate and keep trying the rest
    #[default]
    Continue,
    /// Report the candidate and everyone after them, then stop
    Stop,
}

/// Order in which candidates are seated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateOrder {
    #[default]
    InRosterOrder,
    /// Lottery seating: shuffle with a seeded RNG before filling
    Shuffled { seed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignOptions {
    /// Index into the fleet of the first bus to fill
    pub start_bus: usize,
    pub overflow: OverflowPolicy,
    pub order: CandidateOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub candidate_id: String,
    pub bus_index: usize,
    pub bus_name: String,
}

/// Result of one assignment run. Nothing is written to the roster until the
/// caller applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatPlan {
    pub placements: Vec<Placement>,
    /// Candidates left without a seat, in the order they were considered
    pub unassigned: Vec<String>,
    /// Bus occupancy after the plan
    pub loads: Vec<BusLoad>,
}

impl SeatPlan {
    pub fn assigned_count(&self) -> usize {
        self.placements.len()
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty() && self.unassigned.is_empty()
    }

    /// How many placements landed on the named bus
    pub fn placed_on(&self, bus: &str) -> usize {
        self.placements.iter().filter(|p| p.bus_name == bus).count()
    }

    pub fn bus_for(&self, candidate_id: &str) -> Option<&str> {
        self.placements
            .iter()
            .find(|p| p.candidate_id == candidate_id)
            .map(|p| p.bus_name.as_str())
    }

    pub fn summary(&self) -> String {
        if self.unassigned.is_empty() {
            format!("Assigned {} people", self.assigned_count())
        } else {
            format!(
                "Assigned {} people; {} left without a seat",
                self.assigned_count(),
                self.unassigned_count()
            )
        }
    }
}

/// Seat `candidates` on `buses`.
///
/// Pure: `buses` carries the current occupancy and is not modified; the
/// updated occupancy is returned in the plan.
pub fn assign_seats(
    candidates: &[SeatCandidate],
    buses: &[BusLoad],
    options: &AssignOptions,
) -> SeatPlan {
    let mut loads = buses.to_vec();
    let mut order: Vec<&SeatCandidate> = candidates.iter().collect();

    if let CandidateOrder::Shuffled { seed } = options.order {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }

    let mut pointer = options.start_bus;
    let mut placements = Vec::with_capacity(order.len());
    let mut unassigned = Vec::new();

    let mut queue = order.into_iter();
    while let Some(candidate) = queue.next() {
        while pointer < loads.len() && loads[pointer].is_full() {
            debug!(bus = %loads[pointer].name, "Bus full, moving to next");
            pointer += 1;
        }

        let target = (pointer..loads.len()).find(|&i| loads[i].has_room_for(&candidate.role));

        match target {
            Some(i) => {
                loads[i].add_rider(&candidate.role);
                placements.push(Placement {
                    candidate_id: candidate.id.clone(),
                    bus_index: i,
                    bus_name: loads[i].name.clone(),
                });
            }
            None => {
                unassigned.push(candidate.id.clone());
                if options.overflow == OverflowPolicy::Stop {
                    unassigned.extend(queue.by_ref().map(|c| c.id.clone()));
                    break;
                }
            }
        }
    }

    debug!(
        assigned = placements.len(),
        unassigned = unassigned.len(),
        start_bus = options.start_bus,
        "Seat assignment finished"
    );

    SeatPlan {
        placements,
        unassigned,
        loads,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bus;

    fn fleet(capacities: &[u32]) -> Vec<BusLoad> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, cap)| BusLoad::empty(&Bus::new(format!("Bus {}", i + 1), *cap)))
            .collect()
    }

    fn quota_fleet(count: usize, capacity: u32, student_limit: u32) -> Vec<BusLoad> {
        (0..count)
            .map(|i| {
                let bus = Bus::new(format!("Bus {}", i + 1), capacity);
                BusLoad::empty(&bus.with_quota(Role::Student, student_limit))
            })
            .collect()
    }

    fn students(n: usize) -> Vec<SeatCandidate> {
        (0..n)
            .map(|i| SeatCandidate::new(format!("S{:03}", i), Role::Student))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Basic fill and spillover
    // -------------------------------------------------------------------------

    #[test]
    fn test_fifty_students_spill_into_second_bus() {
        let buses = fleet(&[45, 45, 45, 45]);
        let plan = assign_seats(&students(50), &buses, &AssignOptions::default());
        assert_eq!(plan.assigned_count(), 50);
        assert_eq!(plan.placed_on("Bus 1"), 45);
        assert_eq!(plan.placed_on("Bus 2"), 5);
        assert!(plan.loads[0].is_full());
        assert_eq!(plan.loads[1].occupancy, 5);
        assert_eq!(plan.loads[2].occupancy, 0);
    }

    #[test]
    fn test_empty_candidates() {
        let plan = assign_seats(&[], &fleet(&[45]), &AssignOptions::default());
        assert!(plan.is_empty());
        assert_eq!(plan.assigned_count(), 0);
        assert_eq!(plan.unassigned_count(), 0);
        assert_eq!(plan.summary(), "Assigned 0 people");
    }

    #[test]
    fn test_start_bus_skips_earlier_buses() {
        let options = AssignOptions {
            start_bus: 2,
            ..Default::default()
        };
        let plan = assign_seats(&students(3), &fleet(&[45, 45, 45, 45]), &options);
        assert_eq!(plan.placed_on("Bus 3"), 3);
        assert_eq!(plan.loads[0].occupancy, 0);
        assert_eq!(plan.loads[1].occupancy, 0);
    }

    #[test]
    fn test_start_bus_past_fleet_assigns_nobody() {
        let options = AssignOptions {
            start_bus: 9,
            ..Default::default()
        };
        let plan = assign_seats(&students(4), &fleet(&[45]), &options);
        assert_eq!(plan.assigned_count(), 0);
        assert_eq!(plan.unassigned_count(), 4);
    }

    #[test]
    fn test_existing_occupancy_is_respected() {
        let mut buses = fleet(&[3, 3]);
        buses[0].occupancy = 2;
        let plan = assign_seats(&students(3), &buses, &AssignOptions::default());
        assert_eq!(plan.placed_on("Bus 1"), 1);
        assert_eq!(plan.placed_on("Bus 2"), 2);
        // Input untouched
        assert_eq!(buses[0].occupancy, 2);
    }

    // -------------------------------------------------------------------------
    // Overflow reporting
    // -------------------------------------------------------------------------

    #[test]
    fn test_all_buses_full_reports_remainder() {
        let plan = assign_seats(&students(10), &fleet(&[3, 4]), &AssignOptions::default());
        assert_eq!(plan.assigned_count(), 7);
        assert_eq!(plan.unassigned_count(), 3);
        assert_eq!(plan.unassigned, vec!["S007", "S008", "S009"]);
        assert_eq!(plan.summary(), "Assigned 7 people; 3 left without a seat");
    }

    #[test]
    fn test_stop_policy_reports_everyone_after_first_miss() {
        // Bus 1: 1 seat left for students, teacher seats still open
        let mut buses = quota_fleet(1, 3, 1);
        buses[0].add_rider(&Role::Student);
        let candidates = vec![
            SeatCandidate::new("a", Role::Student),
            SeatCandidate::new("b", Role::Teacher),
        ];

        let cont = assign_seats(&candidates, &buses, &AssignOptions::default());
        assert_eq!(cont.unassigned, vec!["a"]);
        assert_eq!(cont.bus_for("b"), Some("Bus 1"));

        let stop = AssignOptions {
            overflow: OverflowPolicy::Stop,
            ..Default::default()
        };
        let stopped = assign_seats(&candidates, &buses, &stop);
        assert_eq!(stopped.assigned_count(), 0);
        assert_eq!(stopped.unassigned, vec!["a", "b"]);
    }

    // -------------------------------------------------------------------------
    // Role quotas
    // -------------------------------------------------------------------------

    #[test]
    fn test_quota_full_student_skips_but_teacher_fills_general_seats() {
        let mut buses = quota_fleet(2, 45, 43);
        for _ in 0..43 {
            buses[0].add_rider(&Role::Student);
        }
        let candidates = vec![
            SeatCandidate::new("student", Role::Student),
            SeatCandidate::new("teacher", Role::Teacher),
        ];
        let plan = assign_seats(&candidates, &buses, &AssignOptions::default());
        assert_eq!(plan.bus_for("student"), Some("Bus 2"));
        assert_eq!(plan.bus_for("teacher"), Some("Bus 1"));
        assert_eq!(plan.loads[0].occupancy, 44);
        assert_eq!(plan.loads[0].quota_count, 43);
    }

    #[test]
    fn test_quota_invariant_holds_with_mixed_roles() {
        let buses = quota_fleet(3, 10, 8);
        let mut candidates = students(30);
        for i in 0..6 {
            candidates.insert(i * 5, SeatCandidate::new(format!("T{}", i), Role::Teacher));
        }
        let plan = assign_seats(&candidates, &buses, &AssignOptions::default());
        for load in &plan.loads {
            assert!(load.occupancy <= load.capacity);
            assert!(load.quota_count <= 8);
        }
        assert_eq!(
            plan.assigned_count() + plan.unassigned_count(),
            candidates.len()
        );
        // 24 student seats exist across the fleet
        let seated_students = plan
            .placements
            .iter()
            .filter(|p| p.candidate_id.starts_with('S'))
            .count();
        assert_eq!(seated_students, 24);
    }

    // -------------------------------------------------------------------------
    // Invariants
    // -------------------------------------------------------------------------

    #[test]
    fn test_capacity_and_conservation_over_many_shapes() {
        for n in [0usize, 1, 44, 45, 46, 90, 179, 180, 181, 250] {
            for start in 0..4 {
                let options = AssignOptions {
                    start_bus: start,
                    ..Default::default()
                };
                let plan = assign_seats(&students(n), &fleet(&[45, 45, 45, 45]), &options);
                for load in &plan.loads {
                    assert!(load.occupancy <= load.capacity, "n={} start={}", n, start);
                }
                assert_eq!(plan.assigned_count() + plan.unassigned_count(), n);
            }
        }
    }

    #[test]
    fn test_pointer_never_returns_to_a_full_bus() {
        let mut buses = fleet(&[5, 5, 5]);
        buses[1].occupancy = 5;
        let plan = assign_seats(&students(12), &buses, &AssignOptions::default());
        let indices: Vec<usize> = plan.placements.iter().map(|p| p.bus_index).collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(plan.placed_on("Bus 2"), 0);
        assert_eq!(plan.placed_on("Bus 3"), 5);
        assert_eq!(plan.unassigned_count(), 2);
    }

    #[test]
    fn test_deterministic_without_shuffle() {
        let buses = fleet(&[7, 7, 7]);
        let a = assign_seats(&students(19), &buses, &AssignOptions::default());
        let b = assign_seats(&students(19), &buses, &AssignOptions::default());
        assert_eq!(a, b);
    }

    // -------------------------------------------------------------------------
    // Lottery seating
    // -------------------------------------------------------------------------

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let buses = fleet(&[10, 10]);
        let options = AssignOptions {
            order: CandidateOrder::Shuffled { seed: 7 },
            ..Default::default()
        };
        let a = assign_seats(&students(20), &buses, &options);
        let b = assign_seats(&students(20), &buses, &options);
        assert_eq!(a, b);

        let in_order = assign_seats(&students(20), &buses, &AssignOptions::default());
        assert_ne!(a.placements, in_order.placements);
        assert_eq!(a.assigned_count(), 20);
    }

    #[test]
    fn test_shuffle_gives_each_candidate_a_fair_chance() {
        // One seat, four candidates: over many seeds each wins about a quarter of the time
        let buses = fleet(&[1]);
        let candidates = students(4);
        let mut wins = [0usize; 4];
        let trials = 4000;

        for seed in 0..trials {
            let options = AssignOptions {
                order: CandidateOrder::Shuffled { seed },
                ..Default::default()
            };
            let plan = assign_seats(&candidates, &buses, &options);
            let winner = &plan.placements[0].candidate_id;
            let idx = candidates.iter().position(|c| &c.id == winner).unwrap();
            wins[idx] += 1;
        }

        for count in wins {
            let share = count as f64 / trials as f64;
            assert!((0.20..0.30).contains(&share), "share {}", share);
        }
    }
}
