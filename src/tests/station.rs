use std::str::FromStr;

use crate::{
    prelude::{DayOfYear, Duration, Epoch, Error, ObservationFile, Station, Vector3},
    tests::{init_logger, interval, station_position, t0, EpochsBuilder, G01, G02},
};

use rstest::*;

fn one_day() -> Duration {
    Duration::from_seconds(86_400.0)
}

fn daily_file(start: Epoch) -> ObservationFile {
    ObservationFile::new(interval())
        .with_epochs(EpochsBuilder::default().satellites(&[G01, G02]).build_from(start))
}

#[test]
fn files_are_sorted() {
    init_logger();
    let day1 = daily_file(t0());
    let day2 = daily_file(t0() + one_day()).with_approx_position(station_position().ecef());

    let station = Station::from_files(vec![day2, day1]).unwrap();

    assert_eq!(station.interval(), interval());
    assert_eq!(station.epochs().len(), 2 * 2880);
    assert_eq!(station.epochs()[0].epoch, t0());
    assert_eq!(
        station.days(),
        vec![DayOfYear::new(2020, 177), DayOfYear::new(2020, 178)]
    );
    assert!(station.arcs().is_empty());
    assert!(station
        .epochs()
        .windows(2)
        .all(|w| w[0].epoch < w[1].epoch));
}

#[test]
fn approximate_position() {
    init_logger();
    // null placeholder in the first file, plausible position in the second one
    let day1 = daily_file(t0()).with_approx_position(Vector3::new(0.0, 0.0, 0.0));
    let day2 = daily_file(t0() + one_day()).with_approx_position(station_position().ecef());
    // empty files are dropped, whatever their header says
    let empty = ObservationFile::new(interval()).with_approx_position(Vector3::new(1.0E6, 0.0, 0.0));

    let station = Station::from_files(vec![empty, day1, day2]).unwrap();
    let position = station.position().unwrap();
    assert!((position.ecef() - station_position().ecef()).norm() < 1.0E-6);

    let station = Station::from_files(vec![daily_file(t0())]).unwrap();
    assert!(station.position().is_none());
}

#[test]
fn no_observations() {
    let station = Station::from_files(vec![]).unwrap();
    assert!(station.epochs().is_empty());
    assert!(station.days().is_empty());

    let station = Station::from_files(vec![ObservationFile::new(interval())]).unwrap();
    assert!(station.epochs().is_empty());
}

#[rstest]
#[case(30.0005, true)]
#[case(15.0, false)]
#[case(60.0, false)]
fn sampling_interval(#[case] seconds: f64, #[case] accepted: bool) {
    let day1 = daily_file(t0());
    let mut day2 = daily_file(t0() + one_day());
    day2.interval = Duration::from_seconds(seconds);

    match Station::from_files(vec![day1, day2]) {
        Ok(_) => assert!(accepted),
        Err(e) => {
            assert!(!accepted);
            assert_eq!(e, Error::InconsistentSampling(30.0, seconds));
        },
    }
}

#[test]
fn overlapping_files() {
    let day1 = daily_file(t0());
    let start = t0() + Duration::from_seconds(12.0 * 3600.0);
    let day2 = daily_file(start);

    assert_eq!(
        Station::from_files(vec![day2, day1]).err(),
        Some(Error::OverlappingObservations(start))
    );
}

#[test]
fn cross_year() {
    let dec31 = Epoch::from_str("2020-12-31T00:00:00 GPST").unwrap();
    let files = vec![daily_file(dec31), daily_file(dec31 + one_day())];
    assert_eq!(
        Station::from_files(files).err(),
        Some(Error::CrossYear(2020, 2021))
    );
}

#[test]
fn non_contiguous_days() {
    init_logger();
    let files = vec![
        daily_file(t0()),
        daily_file(t0() + one_day() * 2_i64),
    ];
    let station = Station::from_files(files).unwrap();
    assert_eq!(
        station.days(),
        vec![DayOfYear::new(2020, 177), DayOfYear::new(2020, 179)]
    );
}

#[test]
fn unordered_epochs() {
    let mut epochs = EpochsBuilder::default().len(10).build();
    epochs.swap(4, 5);
    let t = epochs[5].epoch;
    assert_eq!(
        Station::new(interval(), None, epochs).err(),
        Some(Error::UnorderedEpochs(t))
    );

    // duplicated epoch
    let mut epochs = EpochsBuilder::default().len(10).build();
    epochs[6].epoch = epochs[5].epoch;
    let t = epochs[6].epoch;
    assert_eq!(
        Station::new(interval(), None, epochs).err(),
        Some(Error::UnorderedEpochs(t))
    );
}

#[test]
fn station_is_send() {
    fn assert_send<T: Send + Sync>() {}
    assert_send::<Station>();
}
