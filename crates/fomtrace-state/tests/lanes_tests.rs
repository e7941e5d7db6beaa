use fomtrace_protocol::Timestamp;
use fomtrace_state::*;

fn at(us: i64) -> Timestamp {
    Timestamp::parse("2016-03-24-09:18:46.000000")
        .unwrap()
        .checked_add_micros(us)
        .unwrap()
}

#[test]
fn test_task_lanes_first_fit() {
    let mut lanes = TaskLanes::new(2, 3);
    assert_eq!(lanes.allocate(0, "0xa"), Ok(0));
    assert_eq!(lanes.allocate(0, "0xb"), Ok(1));
    assert_eq!(lanes.allocate(1, "0xc"), Ok(0), "groups are independent");
    assert!(lanes.release(0, 0, "0xa"));
    assert_eq!(lanes.allocate(0, "0xd"), Ok(0), "lowest freed lane is reused first");
    assert_eq!(lanes.allocate(0, "0xe"), Ok(2));
    assert_eq!(lanes.occupied(0), 3);
}

#[test]
fn test_task_lanes_overflow_reported() {
    let mut lanes = TaskLanes::new(1, 2);
    lanes.allocate(0, "0xa").unwrap();
    lanes.allocate(0, "0xb").unwrap();
    assert_eq!(
        lanes.allocate(0, "0xc"),
        Err(StateError::CapacityExceeded { group: 0, capacity: 2 })
    );
    assert_eq!(lanes.occupied(0), 2);
}

#[test]
fn test_task_lanes_unknown_group() {
    let mut lanes = TaskLanes::new(2, 2);
    assert_eq!(
        lanes.allocate(5, "0xa"),
        Err(StateError::UnknownGroup { group: 5, groups: 2 })
    );
}

#[test]
fn test_release_requires_holder() {
    let mut lanes = TaskLanes::new(1, 2);
    lanes.allocate(0, "0xa").unwrap();
    assert!(!lanes.release(0, 0, "0xb"));
    assert_eq!(lanes.occupant(0, 0), Some("0xa"));
    assert!(!lanes.release(0, 1, "0xa"), "empty lane cannot be released");
    assert!(lanes.release(0, 0, "0xa"));
    assert_eq!(lanes.occupant(0, 0), None);
}

#[test]
fn test_io_lanes_disjoint_reuse() {
    let mut io = IoLanes::new(4);
    assert_eq!(io.allocate(1, at(0), at(100)), Ok(0));
    // Overlaps op 1, goes next door.
    assert_eq!(io.allocate(2, at(50), at(150)), Ok(1));
    // Starts after op 1 ended.
    assert_eq!(io.allocate(3, at(101), at(200)), Ok(0));
}

#[test]
fn test_io_lanes_touching_intervals_do_not_share() {
    let mut io = IoLanes::new(2);
    io.allocate(1, at(0), at(100)).unwrap();
    assert_eq!(io.allocate(2, at(100), at(120)), Ok(1), "end must be strictly before start");
}

#[test]
fn test_io_lanes_out_of_order_completion() {
    let mut io = IoLanes::new(3);
    // Op 7 launched late but completed first.
    io.allocate(7, at(500), at(600)).unwrap();
    // Op 8 launched earlier, reported later: lane 0 is still "taken" in its span.
    assert_eq!(io.allocate(8, at(100), at(700)), Ok(1));
    assert_eq!(io.occupant(0).map(|iv| iv.id), Some(7));
    assert_eq!(io.occupant(1).map(|iv| iv.id), Some(8));
}

#[test]
fn test_io_lanes_exhausted() {
    let mut io = IoLanes::new(1);
    io.allocate(1, at(0), at(100)).unwrap();
    assert_eq!(
        io.allocate(2, at(10), at(20)),
        Err(StateError::IoLanesExhausted { capacity: 1 })
    );
}

#[test]
fn test_io_lanes_never_overlap() {
    let mut io = IoLanes::new(8);
    let mut placed: Vec<(usize, i64, i64)> = Vec::new();
    // Deterministic pseudo-random intervals, reported in completion order.
    let mut seed = 17u64;
    let mut ends = Vec::new();
    for _ in 0..200 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let start = (seed >> 33) as i64 % 10_000;
        let len = 1 + (seed >> 20) as i64 % 400;
        ends.push((start + len, start));
    }
    ends.sort();
    for (id, (end, start)) in ends.into_iter().enumerate() {
        if let Ok(lane) = io.allocate(id as u64, at(start), at(end)) {
            for &(l, s, e) in &placed {
                if l == lane {
                    assert!(e < start || end < s, "lane {lane} overlap");
                }
            }
            placed.push((lane, start, end));
        }
    }
    assert!(!placed.is_empty());
}
