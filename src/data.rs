use csv::{Reader, Writer};
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::model::{RiskLabel, FEATURE_COUNT};

pub const DEFAULT_ROWS: usize = 500;

/// One labeled row of the synthetic attendance dataset. Field order is the
/// CSV column order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatasetRow {
    pub attendance_percentage: f64,
    pub leave_percentage: f64,
    pub internal_marks: u32,
    pub status: RiskLabel,
}

impl DatasetRow {
    pub fn synthesize<R: Rng>(rng: &mut R) -> Self {
        let attendance_percentage = rng.gen_range(40.0..=95.0);
        DatasetRow {
            attendance_percentage,
            leave_percentage: 100.0 - attendance_percentage,
            internal_marks: rng.gen_range(35..=90),
            status: RiskLabel::from_attendance(attendance_percentage),
        }
    }

    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.attendance_percentage,
            self.leave_percentage,
            self.internal_marks as f64,
        ]
    }
}

pub fn generate_rows<R: Rng>(rng: &mut R, count: usize) -> Vec<DatasetRow> {
    (0..count).map(|_| DatasetRow::synthesize(rng)).collect()
}

pub fn write_rows<W: io::Write>(writer: W, rows: &[DatasetRow]) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: impl AsRef<Path>, rows: &[DatasetRow]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_rows(file, rows)
}

pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<DatasetRow>, csv::Error> {
    let mut rdr = Reader::from_reader(reader);
    rdr.deserialize().collect()
}

pub fn load_data(path: impl AsRef<Path>) -> Result<Vec<DatasetRow>, csv::Error> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}

/// Splits rows into the `n x 3` feature matrix and label vector used for
/// training.
pub fn to_training_set(rows: &[DatasetRow]) -> (Array2<f64>, Array1<RiskLabel>) {
    let mut features = Array2::zeros((rows.len(), FEATURE_COUNT));
    for (mut target, row) in features.rows_mut().into_iter().zip(rows) {
        target.assign(&Array1::from(row.features().to_vec()));
    }
    let targets = rows.iter().map(|row| row.status).collect::<Array1<_>>();
    (features, targets)
}
