use std::collections::BTreeSet;

use flightmr::formats::records;
use flightmr::max_extract::find_max;
use flightmr::{sequential, Flight, KeyCount, MRController, MRError, MRParameters};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn flight(passenger: &str) -> Flight {
    Flight {
        passenger_id: String::from(passenger),
        flight_id: String::from("MBA8071P"),
        from: String::from("KUL"),
        to: String::from("PEK"),
        departure: 1420563856,
        duration: 1001,
    }
}

fn controller(size: usize) -> MRController<flightmr::mapreducer::FlightCounter> {
    MRController::flight_counter(MRParameters::new().set_partition_size(size)).unwrap()
}

fn keys(ks: &[&str]) -> BTreeSet<String> {
    ks.iter().map(|k| k.to_string()).collect()
}

#[test]
fn small_job_end_to_end() {
    init_logging();
    let ctrl = controller(2);
    let input = vec![flight("A"), flight("B"), flight("A")];

    let global = ctrl.compute(input.clone()).unwrap();
    assert_eq!(global.entries(), &[KeyCount::new("A", 2), KeyCount::new("B", 1)]);

    let max = ctrl.max_flights(input).unwrap();
    assert_eq!(max.count, 2);
    assert_eq!(max.keys, keys(&["A"]));
}

#[test]
fn single_key_across_partitions() {
    init_logging();
    let ctrl = controller(1);
    let input: Vec<Flight> = (0..5).map(|_| flight("X")).collect();

    assert_eq!(ctrl.partition(input.clone()).unwrap().len(), 5);
    let global = ctrl.compute(input.clone()).unwrap();
    assert_eq!(global.entries(), &[KeyCount::new("X", 5)]);

    let max = ctrl.max_flights(input).unwrap();
    assert_eq!(max.count, 5);
    assert_eq!(max.keys, keys(&["X"]));
}

#[test]
fn ties_from_file() {
    init_logging();
    let input = records::load("testdata/flights.csv").unwrap();

    for size in [1, 3, 7, 20, 100] {
        let max = controller(size).max_flights(input.clone()).unwrap();
        assert_eq!(max.count, 4);
        assert_eq!(max.keys, keys(&["EZC9678QI6", "UES9151GS5"]));
    }
    assert_eq!(
        sequential::max_flights(&input).unwrap(),
        controller(6).max_flights(input).unwrap()
    );
}

#[test]
fn repartitioning_gives_same_global_result() {
    init_logging();
    let input = records::load("testdata/flights.csv").unwrap();
    let reference = controller(input.len()).compute(input.clone()).unwrap();

    for size in 1..input.len() {
        assert_eq!(controller(size).compute(input.clone()).unwrap(), reference);
    }
    let capped = MRController::flight_counter(MRParameters::new().set_partition_size(2).set_mappers(3)).unwrap();
    assert_eq!(capped.compute(input).unwrap(), reference);
}

#[test]
fn empty_input() {
    init_logging();
    let ctrl = controller(10);
    assert!(ctrl.compute(Vec::new()).unwrap().is_empty());

    match ctrl.max_flights(Vec::new()) {
        Err(MRError::EmptyInput(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(find_max(&Default::default()), Err(MRError::EmptyInput(_))));
}

#[test]
fn malformed_file() {
    match records::load("testdata/malformed.csv") {
        Err(MRError::Parse { line, message }) => {
            assert_eq!(line, 2);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
