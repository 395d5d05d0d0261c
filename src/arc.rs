//! Satellite arcs
use std::collections::BTreeMap;

use log::debug;

use crate::{
    constants::GPS_MAX_PRN,
    prelude::{Constellation, Duration, Error, ObsEpoch, SV},
    time::is_nominal_step,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contiguous run of observations of one [SV]. [Arc]s do not own
/// any data: they index the epochs of the [Station](crate::prelude::Station),
/// both bounds included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arc {
    /// [SV]
    pub sv: SV,
    /// First epoch index
    pub start: usize,
    /// Last epoch index (included)
    pub end: usize,
}

impl std::fmt::Display for Arc {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}[{}, {}]", self.sv, self.start, self.end)
    }
}

impl Arc {
    /// Builds new [Arc]. Bounds are swapped if need be.
    pub fn new(sv: SV, start: usize, end: usize) -> Self {
        Self {
            sv,
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Number of epochs
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// An [Arc] always holds at least one epoch
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if this epoch index lies within this [Arc]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Epoch indices, in chronological order
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Splits this [Arc] into `[start, index - 1]` and `[index, end]`.
    /// `index` must verify `start < index <= end`.
    pub fn split(&self, index: usize) -> Result<(Self, Self), Error> {
        if index <= self.start || index > self.end {
            return Err(Error::InvalidArcSplit {
                sv: self.sv,
                start: self.start,
                end: self.end,
                index,
            });
        }
        Ok((
            Self::new(self.sv, self.start, index - 1),
            Self::new(self.sv, index, self.end),
        ))
    }

    /// Returns [Arc] reduced by `head` epochs at the start and `tail` epochs at the end,
    /// or None if nothing remains.
    pub fn shrink(&self, head: usize, tail: usize) -> Option<Self> {
        let start = self.start.checked_add(head)?;
        let end = self.end.checked_sub(tail)?;
        if end >= start {
            Some(Self::new(self.sv, start, end))
        } else {
            None
        }
    }

    /// Returns the fragments that surround the epoch at `index`, which is excluded.
    pub fn exclude(&self, index: usize) -> (Option<Self>, Option<Self>) {
        if !self.contains(index) {
            return (Some(*self), None);
        }
        if index == self.start {
            return (None, self.shrink(1, 0));
        }
        match self.split(index) {
            Ok((before, after)) => (Some(before), after.shrink(1, 0)),
            Err(_) => (self.shrink(0, 1), None),
        }
    }
}

/// Scans the epochs once per [SV] and returns the maximal runs of
/// usable, regularly sampled observations that are at least `min_len` long.
pub(crate) fn detect(
    epochs: &[ObsEpoch],
    interval: Duration,
    min_len: usize,
) -> BTreeMap<SV, Vec<Arc>> {
    let mut arcs = BTreeMap::<SV, Vec<Arc>>::new();

    for prn in 1..=GPS_MAX_PRN {
        let sv = SV::new(Constellation::GPS, prn);
        let mut found = Vec::<Arc>::new();
        let mut run_start = Option::<usize>::None;

        for (i, epoch) in epochs.iter().enumerate() {
            let usable = epoch.flag.is_ok()
                && epoch
                    .record(sv)
                    .map(|rec| rec.is_arc_candidate())
                    .unwrap_or(false);

            if !usable {
                if let Some(start) = run_start.take() {
                    retain(&mut found, Arc::new(sv, start, i - 1), min_len);
                }
                continue;
            }

            match run_start {
                None => run_start = Some(i),
                Some(start) => {
                    if !is_nominal_step(epochs[i - 1].epoch, epoch.epoch, interval) {
                        retain(&mut found, Arc::new(sv, start, i - 1), min_len);
                        run_start = Some(i);
                    }
                },
            }
        }

        if let Some(start) = run_start {
            retain(&mut found, Arc::new(sv, start, epochs.len() - 1), min_len);
        }

        if !found.is_empty() {
            arcs.insert(sv, found);
        }
    }

    arcs
}

fn retain(arcs: &mut Vec<Arc>, arc: Arc, min_len: usize) {
    if arc.len() >= min_len {
        debug!("{} - new arc ({} epochs)", arc, arc.len());
        arcs.push(arc);
    }
}
