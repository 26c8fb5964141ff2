use crate::error::{PipelineError, PipelineResult};
use crate::history::HistoryLog;
use crate::hr::HrPoint;
use crate::store::ExperimentDir;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One CSV row; `None` where a log has no entry for the index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryRow {
    pub index: usize,
    pub energy: Option<f64>,
    pub fidelity: Option<f64>,
    pub hr_distance: Option<f64>,
}

/// Align the three logs on parameter index.
pub fn trajectory_rows(energies: &[f64], fidelities: &[f64], hr: &[HrPoint]) -> Vec<TrajectoryRow> {
    let hr_len = hr.iter().map(|p| p.param_index + 1).max().unwrap_or(0);
    let len = energies.len().max(fidelities.len()).max(hr_len);

    let mut rows: Vec<TrajectoryRow> = (0..len)
        .map(|index| TrajectoryRow {
            index,
            energy: energies.get(index).copied(),
            fidelity: fidelities.get(index).copied(),
            hr_distance: None,
        })
        .collect();
    for p in hr {
        rows[p.param_index].hr_distance = Some(p.distance);
    }
    rows
}

/// Means of all length-`k` windows; empty when `k` is 0 or exceeds the
/// input.
pub fn moving_average(values: &[f64], k: usize) -> Vec<f64> {
    if k == 0 || k > values.len() {
        return Vec::new();
    }
    values
        .windows(k)
        .map(|w| w.iter().sum::<f64>() / k as f64)
        .collect()
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn write_rows(path: &Path, rows: &[TrajectoryRow]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "index,energy,fidelity,hr_distance")?;
    for r in rows {
        writeln!(
            f,
            "{},{},{},{}",
            r.index,
            cell(r.energy),
            cell(r.fidelity),
            cell(r.hr_distance)
        )?;
    }
    f.flush()
}

/// Long format `series,index,value`; `index` is the last index covered by
/// the window.
fn write_windowed(path: &Path, series: &[(&str, Vec<(usize, f64)>)], k: usize) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "series,index,value")?;
    for (name, points) in series {
        let values: Vec<f64> = points.iter().map(|p| p.1).collect();
        for (start, mean) in moving_average(&values, k).into_iter().enumerate() {
            writeln!(f, "{},{},{}", name, points[start + k - 1].0, mean)?;
        }
    }
    f.flush()
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> PipelineError + '_ {
    move |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A log that was never written counts as empty.
fn load_or_empty<T>(path: &Path) -> PipelineResult<Vec<T>>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    match HistoryLog::<T>::load(path) {
        Ok(log) => Ok(log.into_entries()),
        Err(PipelineError::MissingInput(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Export the trajectories of an experiment: `out` gets the aligned rows,
/// and with a `window` a second file `out` + `.ma.csv` gets the moving
/// averages. `tag` selects the HR run (`{shots}_shots_{backend}`).
pub fn export_trajectory(
    dir: &ExperimentDir,
    tag: Option<&str>,
    out: &Path,
    window: Option<usize>,
) -> PipelineResult<Vec<TrajectoryRow>> {
    let energies: Vec<f64> = HistoryLog::<f64>::load(&dir.energy_history_path())?.into_entries();
    let fidelities: Vec<f64> = load_or_empty(&dir.fidelity_history_path())?;
    let hr: Vec<HrPoint> = match tag {
        Some(tag) => HistoryLog::<HrPoint>::load(&dir.hr_history_path(tag))?.into_entries(),
        None => Vec::new(),
    };

    let rows = trajectory_rows(&energies, &fidelities, &hr);
    write_rows(out, &rows).map_err(io_err(out))?;

    if let Some(k) = window {
        let mut ma_path = out.as_os_str().to_owned();
        ma_path.push(".ma.csv");
        let ma_path = PathBuf::from(ma_path);

        let series: [(&str, Vec<(usize, f64)>); 3] = [
            ("energy", energies.iter().copied().enumerate().collect()),
            ("fidelity", fidelities.iter().copied().enumerate().collect()),
            ("hr_distance", hr.iter().map(|p| (p.param_index, p.distance)).collect()),
        ];
        write_windowed(&ma_path, &series, k).map_err(io_err(&ma_path))?;
    }

    Ok(rows)
}
