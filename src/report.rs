//! Reports of a regularization sweep
//!
//! Text reports (recap table, per-sentence predictions) and plots rendered with `plotters`:
//! accuracy against regularization strength and the confusion matrix of a model.
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, ArrayBase, Data, Ix1};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use sentiment_datasets::LabeledSentence;

use crate::error::{Error, Result};
use crate::sweep::SweepResult;

/// Display names of the five sentiment classes, from very negative to very positive
pub const CLASS_NAMES: [&str; 5] = ["- -", "-", "neut", "+", "+ +"];

fn plot_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

/// Tab separated table of the accuracies of every regularization strength
pub fn recap_table<M>(results: &[SweepResult<M>]) -> String {
    let mut lines = vec!["Reg\t\tTrain\tDev\tTest".to_string()];
    lines.extend(results.iter().map(|result| {
        format!(
            "{:.2E}\t{:.3}\t{:.3}\t{:.3}",
            result.reg, result.train, result.dev, result.test
        )
    }));

    lines.join("\n")
}

/// Write `True<TAB>Predicted<TAB>Text` rows, one per sentence
pub fn write_predictions_to<W, S>(
    mut writer: W,
    sentences: &[LabeledSentence],
    prediction: &ArrayBase<S, Ix1>,
) -> Result<()>
where
    W: Write,
    S: Data<Elem = usize>,
{
    if sentences.len() != prediction.len() {
        return Err(Error::MismatchedSamples {
            expected: sentences.len(),
            found: prediction.len(),
        });
    }

    writeln!(writer, "True\tPredicted\tText")?;
    for (sentence, predicted) in sentences.iter().zip(prediction.iter()) {
        writeln!(
            writer,
            "{}\t{}\t{}",
            sentence.label,
            predicted,
            sentence.words.join(" ")
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the predictions for `sentences` to the file at `path`
pub fn write_predictions<P, S>(
    path: P,
    sentences: &[LabeledSentence],
    prediction: &ArrayBase<S, Ix1>,
) -> Result<()>
where
    P: AsRef<Path>,
    S: Data<Elem = usize>,
{
    let file = File::create(path)?;
    write_predictions_to(BufWriter::new(file), sentences, prediction)
}

/// Plot train and dev accuracy against the regularization strength on a log scale
pub fn plot_reg_vs_accuracy<P: AsRef<Path>, M>(path: P, results: &[SweepResult<M>]) -> Result<()> {
    if results.is_empty() {
        return Err(Error::Plot("no sweep results to plot".to_string()));
    }

    let (min, max) = results
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), result| {
            (min.min(result.reg), max.max(result.reg))
        });
    // a single strength still needs a non-degenerate axis
    let (min, max) = if min < max {
        (min, max)
    } else {
        (min / 10., max * 10.)
    };

    let root = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Accuracy vs regularization", ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((min..max).log_scale(), 0f64..100f64)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("regularization")
        .y_desc("accuracy")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            results.iter().map(|result| (result.reg, result.train)),
            &BLUE,
        ))
        .map_err(plot_error)?
        .label("train")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            results.iter().map(|result| (result.reg, result.dev)),
            &RED,
        ))
        .map_err(plot_error)?
        .label("dev")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE)
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Linear interpolation from a pale to a dark red
fn heat_color(count: usize, max: usize) -> RGBColor {
    let t = if max == 0 {
        0.
    } else {
        count as f64 / max as f64
    };
    let channel = |from: f64, to: f64| (from + (to - from) * t).round() as u8;

    RGBColor(channel(255., 103.), channel(245., 0.), channel(240., 13.))
}

fn class_label(value: &SegmentValue<i32>, class_names: &[&str], reversed: bool) -> String {
    let index = match value {
        SegmentValue::CenterOf(index) => *index,
        _ => return String::new(),
    };
    let index = if reversed {
        class_names.len() as i32 - 1 - index
    } else {
        index
    };

    usize::try_from(index)
        .ok()
        .and_then(|index| class_names.get(index))
        .map(|name| name.to_string())
        .unwrap_or_default()
}

/// Plot a confusion count matrix as a heat map
///
/// Rows of `counts` are true classes, columns predicted classes. The first class is drawn at
/// the top left, every cell is annotated with its count.
pub fn plot_confusion_matrix<P: AsRef<Path>>(
    path: P,
    counts: &Array2<usize>,
    class_names: &[&str],
) -> Result<()> {
    let n = counts.nrows();
    if counts.ncols() != n || class_names.len() != n {
        return Err(Error::Plot(format!(
            "expected a square matrix for {} classes, got {:?}",
            class_names.len(),
            counts.dim()
        )));
    }

    let max = counts.iter().copied().max().unwrap_or(0);
    let threshold = max as f64 / 2.;
    let size = n as i32;

    let root = BitMapBackend::new(path.as_ref(), (640, 640)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Confusion matrix", ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..size).into_segmented(), (0..size).into_segmented())
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Predicted label")
        .y_desc("True label")
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|value| class_label(value, class_names, false))
        .y_label_formatter(&|value| class_label(value, class_names, true))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(counts.indexed_iter().map(|((row, col), &count)| {
            let (x, y) = (col as i32, size - 1 - row as i32);
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                heat_color(count, max).filled(),
            )
        }))
        .map_err(plot_error)?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart
        .draw_series(counts.indexed_iter().map(|((row, col), &count)| {
            let color = if count as f64 > threshold { &WHITE } else { &BLACK };
            Text::new(
                count.to_string(),
                (
                    SegmentValue::CenterOf(col as i32),
                    SegmentValue::CenterOf(size - 1 - row as i32),
                ),
                ("sans-serif", 16).into_font().color(color).pos(centered),
            )
        }))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn scored(reg: f64, train: f64, dev: f64, test: f64) -> SweepResult<()> {
        SweepResult {
            reg,
            model: (),
            train,
            dev,
            test,
        }
    }

    #[test]
    fn recap_lists_every_result() {
        let results = vec![scored(1e-4, 31.25, 30., 29.5), scored(0.5, 28., 27.125, 26.)];

        let table = recap_table(&results);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Reg\t\tTrain\tDev\tTest");
        assert_eq!(lines[1], "1.00E-4\t31.250\t30.000\t29.500");
        assert_eq!(lines[2], "5.00E-1\t28.000\t27.125\t26.000");
    }

    #[test]
    fn predictions_are_tab_separated() {
        let sentences = vec![
            LabeledSentence {
                words: vec!["a".into(), "gorgeous".into(), "film".into()],
                label: 4,
            },
            LabeledSentence {
                words: vec!["dull".into()],
                label: 1,
            },
        ];
        let mut buffer = Vec::new();

        write_predictions_to(&mut buffer, &sentences, &array![3, 1]).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "True\tPredicted\tText\n4\t3\ta gorgeous film\n1\t1\tdull\n"
        );
    }

    #[test]
    fn predictions_need_one_label_per_sentence() {
        let sentences = vec![LabeledSentence {
            words: vec!["dull".into()],
            label: 1,
        }];

        assert!(matches!(
            write_predictions_to(Vec::new(), &sentences, &array![1, 2]),
            Err(Error::MismatchedSamples {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn writes_prediction_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev_pred.txt");
        let sentences = vec![LabeledSentence {
            words: vec!["fine".into()],
            label: 2,
        }];

        write_predictions(&path, &sentences, &array![2]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "True\tPredicted\tText\n2\t2\tfine\n");
    }

    #[test]
    fn heat_color_ends() {
        assert_eq!(heat_color(0, 10), RGBColor(255, 245, 240));
        assert_eq!(heat_color(10, 10), RGBColor(103, 0, 13));
        assert_eq!(heat_color(0, 0), RGBColor(255, 245, 240));
    }

    #[test]
    fn class_labels_follow_axis_direction() {
        let names = CLASS_NAMES;

        assert_eq!(class_label(&SegmentValue::CenterOf(0), &names, false), "- -");
        assert_eq!(class_label(&SegmentValue::CenterOf(0), &names, true), "+ +");
        assert_eq!(class_label(&SegmentValue::Exact(1), &names, false), "");
        assert_eq!(class_label(&SegmentValue::CenterOf(7), &names, false), "");
    }

    #[test]
    fn confusion_plot_needs_square_matrix() {
        let counts = Array2::zeros((2, 3));

        assert!(matches!(
            plot_confusion_matrix("unused.png", &counts, &CLASS_NAMES[..2]),
            Err(Error::Plot(_))
        ));
    }

    #[test]
    fn accuracy_plot_needs_results() {
        let results: Vec<SweepResult<()>> = Vec::new();

        assert!(matches!(
            plot_reg_vs_accuracy("unused.png", &results),
            Err(Error::Plot(_))
        ));
    }

    #[test]
    fn renders_confusion_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev_conf.png");
        let counts = array![
            [7, 2, 1, 0, 0],
            [3, 9, 2, 1, 0],
            [0, 2, 4, 2, 0],
            [0, 1, 3, 8, 2],
            [0, 0, 0, 4, 6],
        ];

        plot_confusion_matrix(&path, &counts, &CLASS_NAMES).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn renders_accuracy_curves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reg_acc.png");
        let results = vec![scored(1e-4, 40., 35., 33.), scored(1e2, 30., 28., 27.)];

        plot_reg_vs_accuracy(&path, &results).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        // a single strength still gets an axis around it
        let single = dir.path().join("single.png");
        plot_reg_vs_accuracy(&single, &results[..1]).unwrap();
        assert!(std::fs::metadata(&single).unwrap().len() > 0);
    }
}
