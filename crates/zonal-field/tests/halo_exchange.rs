//! Halo exchange across worker threads joined by channel communicators.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use zonal_field::{ChannelComm, Field, FunctionSpace, StructuredColumns};
use zonal_grid::StructuredGrid;
use zonal_partition::{Distribution, PartitionerFactory};
use zonal_test_utils::{octahedral, reduced_2442, shared, RecordingFunctionSpace};

fn decompose(grid: &Arc<StructuredGrid>, strategy: &str, n: usize) -> Vec<StructuredColumns> {
    let dist: Distribution = PartitionerFactory::build_with(strategy, grid.clone(), n)
        .unwrap()
        .distribution()
        .unwrap();
    ChannelComm::group(n)
        .into_iter()
        .map(|comm| StructuredColumns::new(grid.clone(), &dist, Arc::new(comm)).unwrap())
        .collect()
}

/// Fill owned nodes from the global index, exchange, and check every node.
fn run_exchange(spaces: Vec<StructuredColumns>) {
    thread::scope(|s| {
        for fs in spaces {
            s.spawn(move || {
                let fs = Arc::new(fs);
                let mut field = Field::new_real64("lat", 2, fs.clone()).unwrap();
                {
                    let data = field.data_mut::<f64>().unwrap();
                    data.fill(f64::NAN);
                    for local in 0..fs.nb_owned() {
                        let g = fs.global_index(local).unwrap() as f64;
                        data[2 * local] = g;
                        data[2 * local + 1] = -g;
                    }
                }
                field.halo_exchange().unwrap();

                let data = field.data::<f64>().unwrap();
                for local in 0..fs.nb_nodes() {
                    let g = fs.global_index(local).unwrap() as f64;
                    assert_eq!(data[2 * local], g, "rank {} node {local}", fs.partition());
                    assert_eq!(data[2 * local + 1], -g);
                }
            });
        }
    });
}

#[test]
fn block_decomposition_exchange() {
    run_exchange(decompose(&shared(reduced_2442()), "block", 3));
}

#[test]
fn checkerboard_decomposition_exchange() {
    run_exchange(decompose(&shared(octahedral(4)), "checkerboard", 4));
}

#[test]
fn round_robin_has_large_halos() {
    let grid = shared(octahedral(2));
    let spaces = decompose(&grid, "round_robin", 4);
    for fs in &spaces {
        assert!(fs.nb_halo() >= fs.nb_owned());
        assert!(fs.halo_peers().len() >= 2);
    }
    run_exchange(spaces);
}

#[test]
fn halo_of_every_rank_matches_neighbours() {
    let grid = shared(octahedral(3));
    for fs in decompose(&grid, "shuffled", 3) {
        let owned: Vec<usize> = fs.global_indices()[..fs.nb_owned()].to_vec();
        let mut expected: Vec<usize> = owned
            .iter()
            .flat_map(|&p| grid.neighbours(p).unwrap())
            .filter(|q| owned.binary_search(q).is_err())
            .collect();
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(&fs.global_indices()[fs.nb_owned()..], expected.as_slice());
    }
}

#[test]
fn field_delegates_to_function_space() {
    let fs = Arc::new(RecordingFunctionSpace::new(7));
    let mut f = Field::new_int32("flags", 3, fs.clone()).unwrap();
    f.halo_exchange().unwrap();
    f.halo_exchange().unwrap();
    assert_eq!(fs.call_count(), 2);
    let call = &fs.calls()[0];
    assert_eq!(call.len, 21);
    assert_eq!(call.nb_vars, 3);
    assert_eq!(call.data_type.as_str(), "int32");
    assert_eq!(f.function_space().name(), "Recording");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Every strategy and partition count refreshes every halo node.
    #[test]
    fn exchange_fills_every_halo(n in 1usize..=5, strategy in 0usize..4) {
        let names = PartitionerFactory::list();
        let grid = shared(octahedral(2));
        run_exchange(decompose(&grid, &names[strategy], n));
    }
}
