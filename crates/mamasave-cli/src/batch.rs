//! Batch predictions over a CSV/TSV file of readings.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use mamasave_classifiers::features::FEATURE_NAMES;
use mamasave_classifiers::{RiskFeatures, RiskPrediction, RiskPredictor};

use crate::util::{delimiter_for, validate_tsv_or_csv_file};

/// Read readings from a delimited file whose header names the five feature
/// columns. Extra columns are ignored.
pub fn read_readings<P: AsRef<Path>>(path: P) -> Result<Vec<RiskFeatures>> {
    let path = path.as_ref();
    validate_tsv_or_csv_file(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    let mut readings = Vec::new();
    for (i, record) in reader.deserialize::<RiskFeatures>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let reading = record.with_context(|| format!("Invalid reading on line {}", i + 2))?;
        readings.push(reading);
    }
    Ok(readings)
}

/// Write readings and their predictions, one `p_<label>` column per class.
pub fn write_predictions<W: Write>(
    writer: W,
    delimiter: u8,
    classes: &[String],
    readings: &[RiskFeatures],
    predictions: &[RiskPrediction],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut header: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    header.push("predicted_risk".to_string());
    header.extend(classes.iter().map(|c| format!("p_{}", c)));
    writer.write_record(&header)?;

    for (reading, prediction) in readings.iter().zip(predictions) {
        let mut record: Vec<String> = reading.to_row().iter().map(|v| v.to_string()).collect();
        record.push(prediction.predicted_risk.clone());
        for class in classes {
            let p = prediction.probabilities.get(class).copied().unwrap_or_default();
            record.push(format!("{:.6}", p));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Predict every reading in `input` and write the results to `output`
/// (stdout when `None`). Returns the number of rows written.
pub fn run_batch(predictor: &RiskPredictor, input: &Path, output: Option<&Path>) -> Result<usize> {
    let readings = read_readings(input)?;
    log::info!("Loaded {} readings from {}", readings.len(), input.display());

    let start_time = std::time::Instant::now();
    let predictions = predictor
        .predict_batch(&readings)
        .context("Batch inference failed")?;
    log::info!("Inference completed in {:?}", start_time.elapsed());

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_predictions(
                BufWriter::new(file),
                delimiter_for(path),
                predictor.classes(),
                &readings,
                &predictions,
            )?;
            log::info!("Predictions saved to: {}", path.display());
        }
        None => write_predictions(
            io::stdout().lock(),
            b',',
            predictor.classes(),
            &readings,
            &predictions,
        )?,
    }

    Ok(predictions.len())
}
