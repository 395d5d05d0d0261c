use crate::{
    cfg::CycleSlipOpts,
    observation::{Observable, LLI_LOSS_OF_LOCK},
    prelude::{Arc, ObsEpoch},
    qc::{CycleSlipDetector, Discontinuity, DiscontinuityKind},
    tests::{init_logger, plant_cycles, EpochsBuilder, EPOCHS_PER_DAY, G01},
};

use rstest::*;

#[fixture]
fn detector() -> CycleSlipDetector {
    CycleSlipDetector::new(CycleSlipOpts::default())
}

fn noisy_day() -> Vec<ObsEpoch> {
    EpochsBuilder::default().code_noise(0.05, 1).build()
}

fn full_arc() -> Arc {
    Arc::new(G01, 0, EPOCHS_PER_DAY - 1)
}

#[rstest]
fn clean_arc(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    assert!(detector.detect(&mut epochs, &full_arc()).is_none());

    let arcs = detector.process(&mut epochs, vec![full_arc()], 80);
    assert_eq!(arcs, vec![full_arc()]);
}

#[rstest]
fn wide_lane_cycle_slip(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    plant_cycles(&mut epochs, G01, Observable::L1, 1500, 1.0);

    let discontinuity = detector.detect(&mut epochs, &full_arc()).unwrap();
    assert_eq!(
        discontinuity,
        Discontinuity {
            index: 1500,
            kind: DiscontinuityKind::CycleSlip,
        }
    );
    assert_eq!(
        full_arc().exclude(discontinuity.index),
        (
            Some(Arc::new(G01, 0, 1499)),
            Some(Arc::new(G01, 1501, EPOCHS_PER_DAY - 1))
        )
    );
    assert!(epochs[1500].record(G01).unwrap().cycle_slip);
    assert!(!epochs[1499].record(G01).unwrap().cycle_slip);
}

#[rstest]
fn wide_lane_outlier(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    plant_cycles(&mut epochs, G01, Observable::L2, 1000, 3.0);
    plant_cycles(&mut epochs, G01, Observable::L2, 1001, -3.0);

    let discontinuity = detector.detect(&mut epochs, &full_arc()).unwrap();
    assert_eq!(discontinuity.index, 1000);
    assert_eq!(discontinuity.kind, DiscontinuityKind::Outlier);
    assert!(epochs[1000].record(G01).unwrap().outlier);

    let arcs = detector.process(&mut epochs, vec![full_arc()], 80);
    assert_eq!(
        arcs,
        vec![Arc::new(G01, 0, 999), Arc::new(G01, 1001, EPOCHS_PER_DAY - 1)]
    );
}

#[rstest]
fn geometry_free_cycle_slip(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    // same slip on both carriers: invisible to the wide lane combination
    plant_cycles(&mut epochs, G01, Observable::L1, 700, 5.0);
    plant_cycles(&mut epochs, G01, Observable::L2, 700, 5.0);

    let discontinuity = detector.detect(&mut epochs, &full_arc()).unwrap();
    assert_eq!(
        discontinuity,
        Discontinuity {
            index: 700,
            kind: DiscontinuityKind::CycleSlip,
        }
    );
}

#[rstest]
fn loss_of_lock(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    if let Some(rec) = epochs[400].record_mut(G01) {
        rec.observations = rec
            .observations
            .with_lli(Observable::L2, LLI_LOSS_OF_LOCK);
    }

    let discontinuity = detector.detect(&mut epochs, &full_arc()).unwrap();
    assert_eq!(discontinuity.index, 400);
    assert_eq!(discontinuity.kind, DiscontinuityKind::CycleSlip);
}

#[rstest]
fn data_gap(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    if let Some(rec) = epochs[600].record_mut(G01) {
        rec.observations.remove(Observable::P2);
    }

    let discontinuity = detector.detect(&mut epochs, &full_arc()).unwrap();
    assert_eq!(
        discontinuity,
        Discontinuity {
            index: 600,
            kind: DiscontinuityKind::DataGap,
        }
    );
    let rec = epochs[600].record(G01).unwrap();
    assert!(!rec.cycle_slip && !rec.outlier);
}

#[rstest]
fn work_list(detector: CycleSlipDetector) {
    init_logger();
    let mut epochs = noisy_day();
    plant_cycles(&mut epochs, G01, Observable::L1, 50, 2.0);
    plant_cycles(&mut epochs, G01, Observable::L1, 1200, -1.0);
    plant_cycles(&mut epochs, G01, Observable::L2, 2000, 4.0);

    let arcs = detector.process(&mut epochs, vec![full_arc()], 80);

    // [0, 49] is too short
    assert_eq!(
        arcs,
        vec![
            Arc::new(G01, 51, 1199),
            Arc::new(G01, 1201, 1999),
            Arc::new(G01, 2001, EPOCHS_PER_DAY - 1),
        ]
    );
    for arc in arcs.iter() {
        assert!(arc.len() >= 80);
        assert!(detector.detect(&mut epochs, arc).is_none());
    }
}
