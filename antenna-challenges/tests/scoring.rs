use antenna_challenges::{Antenna, Building, Challenge, Delta, Placement, Track};
use rand::{rngs::SmallRng, SeedableRng};

fn single_building(reward: u32) -> Challenge {
    Challenge::new(
        "single",
        5,
        5,
        vec![Building {
            row: 2,
            col: 2,
            decay: 1,
            value: 10,
        }],
        vec![Antenna {
            range: 2,
            capacity: 3,
        }],
        reward,
    )
    .unwrap()
}

/// Claims recomputed the slow way: every building takes the best score of
/// every antenna in range.
fn brute_force_score(placement: &Placement) -> i64 {
    let challenge = placement.challenge();
    let mut total = 0;
    let mut connected = 0;
    for b in &challenge.buildings {
        let best = (0..challenge.num_antennas())
            .filter_map(|j| {
                let (row, col) = placement.position(j)?;
                let distance = row.abs_diff(b.row) + col.abs_diff(b.col);
                let antenna = &challenge.antennas[j];
                (distance <= antenna.range).then(|| {
                    b.value as i64 * antenna.capacity as i64 - b.decay as i64 * distance as i64
                })
            })
            .max();
        if let Some(best) = best {
            total += best;
            connected += 1;
        }
    }
    if connected == challenge.num_buildings() && connected > 0 {
        total += challenge.reward as i64;
    }
    total
}

#[test]
fn test_ring_scan() {
    let challenge = single_building(0);
    let placement = Placement::new(&challenge);
    let grid = placement.grid();
    assert_eq!(grid.ring(2, 2, 0).collect::<Vec<_>>(), vec![(2, 2)]);
    assert_eq!(
        grid.ring(2, 2, 1).collect::<Vec<_>>(),
        vec![(2, 1), (1, 2), (2, 3), (3, 2)]
    );
    assert_eq!(grid.ring(2, 2, 2).count(), 8);
    // clipped at the corner
    assert_eq!(grid.ring(0, 0, 1).collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    assert_eq!(grid.ring(0, 0, 9).count(), 0);
    for radius in 0..6 {
        for (row, col) in grid.ring(1, 3, radius) {
            assert_eq!(row.abs_diff(1) + col.abs_diff(3), radius);
        }
    }
}

#[test]
fn test_d_score_on_building() {
    let challenge = single_building(100);
    let mut placement = Placement::new(&challenge);
    assert_eq!(
        placement.d_score(0, 2, 2, false),
        Delta {
            score: 130,
            new_connected: 1
        }
    );
    assert_eq!(
        placement.d_score(0, 2, 4, false),
        Delta {
            score: 128,
            new_connected: 1
        }
    );
    // out of range
    assert_eq!(placement.d_score(0, 0, 0, false), Delta::default());
    assert_eq!(placement.building_score(0), None);
}

#[test]
fn test_score_single_building() {
    let challenge = single_building(100);
    let mut placement = Placement::new(&challenge);
    assert!(placement.insert(0, 2, 4));
    assert_eq!(placement.score(), 128);
    assert_eq!(placement.total_connected(), 1);
    assert_eq!(placement.building_score(0), Some(28));

    assert!(placement.move_to(0, 2, 2));
    assert_eq!(placement.score(), 130);
    assert_eq!(placement.building_score(0), Some(30));
}

#[test]
fn test_building_claimed_once() {
    let challenge = Challenge::new(
        "shared",
        10,
        10,
        vec![Building {
            row: 5,
            col: 5,
            decay: 2,
            value: 10,
        }],
        vec![
            Antenna {
                range: 3,
                capacity: 4,
            },
            Antenna {
                range: 1,
                capacity: 5,
            },
        ],
        7,
    )
    .unwrap();
    let mut placement = Placement::new(&challenge);
    placement.insert(0, 5, 2); // 40 - 2 * 3 = 34
    placement.insert(1, 4, 5); // 50 - 2 * 1 = 48
    assert_eq!(placement.score(), 48 + 7);
    assert_eq!(placement.building_score(0), Some(48));
    assert_eq!(placement.total_connected(), 1);

    // the weaker antenna alone
    placement.remove(1);
    assert_eq!(placement.score(), 34 + 7);
}

#[test]
fn test_ties_keep_first_claim() {
    let challenge = Challenge::new(
        "tie",
        5,
        5,
        vec![Building {
            row: 2,
            col: 2,
            decay: 0,
            value: 1,
        }],
        vec![
            Antenna {
                range: 2,
                capacity: 3,
            },
            Antenna {
                range: 2,
                capacity: 3,
            },
        ],
        0,
    )
    .unwrap();
    let mut placement = Placement::new(&challenge);
    placement.insert(0, 2, 1);
    placement.insert(1, 2, 3);
    placement.score();
    assert_eq!(placement.d_score(1, 2, 3, false), Delta::default());
}

#[test]
fn test_reward_fires_on_completion_only() {
    let challenge = Challenge::new(
        "reward",
        6,
        1,
        vec![
            Building {
                row: 0,
                col: 0,
                decay: 0,
                value: 1,
            },
            Building {
                row: 0,
                col: 5,
                decay: 0,
                value: 1,
            },
        ],
        vec![
            Antenna {
                range: 0,
                capacity: 1,
            },
            Antenna {
                range: 0,
                capacity: 1,
            },
            Antenna {
                range: 5,
                capacity: 2,
            },
        ],
        1000,
    )
    .unwrap();
    let mut placement = Placement::new(&challenge);
    placement.insert(0, 0, 0);
    assert_eq!(placement.score(), 1);
    placement.insert(1, 0, 5);
    assert_eq!(placement.score(), 1002);

    // already fully connected: upgrading both claims earns no second reward
    assert_eq!(
        placement.d_score(2, 0, 2, false),
        Delta {
            score: 2,
            new_connected: 0
        }
    );
    placement.insert(2, 0, 2);
    assert_eq!(placement.score(), 1004);
}

#[test]
fn test_score_matches_brute_force() {
    for (i, seed) in [[1u8; 32], [2u8; 32], [3u8; 32]].iter().enumerate() {
        let challenge = Challenge::generate_instance(
            seed,
            &Track {
                width: 30,
                height: 20,
                num_buildings: 60 + 40 * i,
                num_antennas: 12,
                reward: 500,
            },
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(i as u64);
        let mut placement = Placement::new(&challenge);
        placement.randomize(&mut rng).unwrap();
        assert_eq!(placement.score(), brute_force_score(&placement));
    }
}

#[test]
fn test_probe_commit_updates_totals() {
    let challenge = Challenge::generate_instance(
        &[7u8; 32],
        &Track {
            width: 25,
            height: 25,
            num_buildings: 80,
            num_antennas: 6,
            reward: 1000,
        },
    )
    .unwrap();
    let mut placement = Placement::new(&challenge);
    placement
        .randomize(&mut SmallRng::seed_from_u64(11))
        .unwrap();
    placement.score();

    let mut probe = placement.begin_probe(3).unwrap();
    assert!(!probe.is_active(3));
    let target = (0..25)
        .map(|col| (12, col))
        .find(|&(row, col)| probe.is_free(row, col))
        .unwrap();
    let expected = probe.delta(target.0, target.1);
    let committed = probe.commit(target.0, target.1).unwrap();
    assert_eq!(committed, expected);

    assert_eq!(placement.position(3), Some(target));
    let cached = placement.total_score();
    assert_eq!(placement.score(), cached);
    assert_eq!(cached, brute_force_score(&placement));
}

#[test]
fn test_dropped_probe_restores_antenna() {
    let challenge = single_building(100);
    let mut placement = Placement::new(&challenge);
    placement.insert(0, 2, 4);
    placement.score();
    {
        let mut probe = placement.begin_probe(0).unwrap();
        assert_eq!(probe.total_score(), 0);
        assert_eq!(probe.delta(2, 2).score, 130);
    }
    assert_eq!(placement.position(0), Some((2, 4)));
    assert_eq!(placement.grid().antenna_at(2, 4), Some(0));
    assert_eq!(placement.total_score(), 128);
}

#[test]
fn test_probe_rejects_taken_cell() {
    let challenge = Challenge::new(
        "taken",
        3,
        3,
        vec![],
        vec![
            Antenna {
                range: 1,
                capacity: 1,
            },
            Antenna {
                range: 1,
                capacity: 1,
            },
        ],
        0,
    )
    .unwrap();
    let mut placement = Placement::new(&challenge);
    placement.insert(0, 0, 0);
    placement.insert(1, 1, 1);
    let probe = placement.begin_probe(0).unwrap();
    assert!(probe.commit(1, 1).is_err());
    // the failed commit dropped the probe, which put the antenna back
    assert_eq!(placement.position(0), Some((0, 0)));
    assert!(placement.begin_probe(0).unwrap().commit(5, 5).is_err());
    assert!(placement.begin_probe(7).is_err());
}

#[test]
#[should_panic]
fn test_d_score_panics_on_unknown_antenna() {
    let challenge = single_building(0);
    let mut placement = Placement::new(&challenge);
    placement.d_score(1, 2, 2, false);
}
