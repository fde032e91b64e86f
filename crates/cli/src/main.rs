mod provenance;
mod summary;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gardener::api::{
    build_curve, build_curve_with_slack, build_curves, draw_foci, slack_range, Curve, CurveCfg,
    FociCfg, FocusCount, LoopSpec, Point, ReplayToken, Sample,
};
use gardener::Vec2;
use polars::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{write_sidecar, Payload};
use summary::{CurveSummary, SweepRow};

#[derive(Parser)]
#[command(name = "gardener")]
#[command(about = "Build and sample multi-focal gardener's curves")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Debug, Clone)]
struct FociArgs {
    /// Focus as "x,y"; repeat for every pin
    #[arg(long = "focus", value_parser = parse_point, allow_hyphen_values = true)]
    foci: Vec<Point>,
    /// CSV file with `x` and `y` columns (appended after --focus pins)
    #[arg(long)]
    foci_csv: Option<PathBuf>,
    /// Draw a random focus cloud with this seed instead
    #[arg(long, conflicts_with_all = ["foci", "foci_csv"])]
    random_seed: Option<u64>,
    /// Outer foci in the random cloud
    #[arg(long, default_value_t = 5)]
    random_outer: usize,
}

#[derive(Args, Debug, Clone, Copy)]
struct LoopArgs {
    /// Absolute loop length
    #[arg(long, conflicts_with = "slack")]
    loop_length: Option<f64>,
    /// Loop length as slack over the hull perimeter
    #[arg(long)]
    slack: Option<f64>,
}

#[derive(Args, Debug, Clone, Copy)]
struct TolArgs {
    #[arg(long)]
    eps_collinear: Option<f64>,
    #[arg(long)]
    eps_root: Option<f64>,
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    eps_length: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SampleMode {
    /// Equal arc-length spacing from arc 0's start
    ArcLength,
    /// Equal polar-angle spacing around the hull centroid
    Angle,
}

#[derive(Subcommand)]
enum Action {
    /// Build one curve and print a JSON summary
    Build {
        #[command(flatten)]
        foci: FociArgs,
        #[command(flatten)]
        lp: LoopArgs,
        #[command(flatten)]
        tol: TolArgs,
        /// Also write the summary here (with a provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Sample one curve into a CSV or Parquet table
    Sample {
        #[command(flatten)]
        foci: FociArgs,
        #[command(flatten)]
        lp: LoopArgs,
        #[command(flatten)]
        tol: TolArgs,
        #[arg(long, default_value_t = 256)]
        count: usize,
        #[arg(long, value_enum, default_value_t = SampleMode::ArcLength)]
        mode: SampleMode,
        /// Output table; `.parquet` selects Parquet, anything else CSV
        #[arg(long)]
        out: PathBuf,
    },
    /// Build curves for a range of slacks over one focus set
    Sweep {
        #[command(flatten)]
        foci: FociArgs,
        #[command(flatten)]
        tol: TolArgs,
        #[arg(long, default_value_t = 0.5)]
        slack_min: f64,
        #[arg(long, default_value_t = 4.0)]
        slack_max: f64,
        #[arg(long, default_value_t = 8)]
        steps: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build { foci, lp, tol, out } => build(&foci, lp, tol, out),
        Action::Sample {
            foci,
            lp,
            tol,
            count,
            mode,
            out,
        } => sample(&foci, lp, tol, count, mode, &out),
        Action::Sweep {
            foci,
            tol,
            slack_min,
            slack_max,
            steps,
            out,
        } => sweep(&foci, tol, slack_min, slack_max, steps, out),
        Action::Report => report(),
    }
}

fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

impl FociArgs {
    fn load(&self) -> Result<Vec<Point>> {
        if let Some(seed) = self.random_seed {
            let cfg = FociCfg {
                outer: FocusCount::Fixed(self.random_outer),
                ..FociCfg::default()
            };
            return Ok(draw_foci(cfg, ReplayToken { seed, index: 0 }));
        }
        let mut pts = self.foci.clone();
        if let Some(path) = &self.foci_csv {
            pts.extend(read_foci_csv(path)?);
        }
        if pts.is_empty() {
            bail!("no foci given (use --focus x,y, --foci-csv or --random-seed)");
        }
        Ok(pts)
    }

    fn source(&self) -> String {
        match (self.random_seed, &self.foci_csv) {
            (Some(seed), _) => format!("random(seed={seed}, outer={})", self.random_outer),
            (None, Some(path)) => format!("csv:{} (+{} inline)", path.display(), self.foci.len()),
            (None, None) => format!("inline({})", self.foci.len()),
        }
    }
}

impl LoopArgs {
    fn spec(&self) -> Result<LoopSpec> {
        match (self.loop_length, self.slack) {
            (Some(l), None) => Ok(LoopSpec::Length(l)),
            (None, Some(s)) => Ok(LoopSpec::Slack(s)),
            (None, None) => bail!("one of --loop-length or --slack is required"),
            (Some(_), Some(_)) => bail!("--loop-length and --slack are exclusive"),
        }
    }
}

impl TolArgs {
    fn cfg(&self) -> CurveCfg {
        let d = CurveCfg::default();
        CurveCfg {
            eps_collinear: self.eps_collinear.unwrap_or(d.eps_collinear),
            eps_root: self.eps_root.unwrap_or(d.eps_root),
            max_iterations: self.max_iterations.unwrap_or(d.max_iterations),
            eps_length: self.eps_length.unwrap_or(d.eps_length),
            ..d
        }
    }

    fn params(&self) -> serde_json::Value {
        let c = self.cfg();
        json!({
            "eps_collinear": c.eps_collinear,
            "eps_root": c.eps_root,
            "max_iterations": c.max_iterations,
            "eps_length": c.eps_length,
        })
    }
}

fn read_foci_csv(path: &Path) -> Result<Vec<Point>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading foci from {}", path.display()))?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    xs.into_iter()
        .zip(ys.into_iter())
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(x), Some(y)) => Ok(Vec2::new(x, y)),
            _ => bail!("row {row} of {} has a missing coordinate", path.display()),
        })
        .collect()
}

fn build_one(foci: &[Point], spec: LoopSpec, cfg: &CurveCfg) -> Result<Curve> {
    let curve = match spec {
        LoopSpec::Length(l) => build_curve(foci, l, cfg),
        LoopSpec::Slack(s) => build_curve_with_slack(foci, s, cfg),
    };
    curve.with_context(|| format!("building curve for {spec:?} around {} foci", foci.len()))
}

fn ensure_parent(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn build(foci_args: &FociArgs, lp: LoopArgs, tol: TolArgs, out: Option<PathBuf>) -> Result<()> {
    let foci = foci_args.load()?;
    let spec = lp.spec()?;
    let curve = build_one(&foci, spec, &tol.cfg())?;
    tracing::info!(
        foci = foci.len(),
        active = curve.hull().len(),
        arcs = curve.len(),
        loop_length = curve.loop_length(),
        "built"
    );
    let summary = CurveSummary::new(&curve, foci.len());
    let text = serde_json::to_string_pretty(&summary)?;
    println!("{text}");
    if let Some(out) = out {
        ensure_parent(&out)?;
        std::fs::write(&out, text.as_bytes())?;
        let params = json!({ "spec": format!("{spec:?}"), "cfg": tol.params() });
        write_sidecar(&out, Payload::new(params, foci_args.source()))?;
    }
    Ok(())
}

fn samples_frame(curve: &Curve, samples: &[Sample]) -> Result<DataFrame> {
    let s: Vec<f64> = samples.iter().map(|p| curve.arc_length_at(p)).collect();
    let x: Vec<f64> = samples.iter().map(|p| p.point.x).collect();
    let y: Vec<f64> = samples.iter().map(|p| p.point.y).collect();
    let tx: Vec<f64> = samples.iter().map(|p| p.tangent.x).collect();
    let ty: Vec<f64> = samples.iter().map(|p| p.tangent.y).collect();
    let arc: Vec<u32> = samples.iter().map(|p| p.arc as u32).collect();
    let theta: Vec<f64> = samples.iter().map(|p| p.theta).collect();
    let kappa: Vec<f64> = samples.iter().map(|p| curve.curvature(p)).collect();
    let df = df!(
        "s" => s,
        "x" => x,
        "y" => y,
        "tx" => tx,
        "ty" => ty,
        "arc" => arc,
        "theta" => theta,
        "curvature" => kappa
    )?;
    Ok(df)
}

fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    ensure_parent(out)?;
    let file = std::fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match out.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(file).finish(df)?;
        }
        _ => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
    }
    Ok(())
}

fn sample(
    foci_args: &FociArgs,
    lp: LoopArgs,
    tol: TolArgs,
    count: usize,
    mode: SampleMode,
    out: &Path,
) -> Result<()> {
    if count == 0 {
        bail!("--count must be positive");
    }
    let foci = foci_args.load()?;
    let spec = lp.spec()?;
    let curve = build_one(&foci, spec, &tol.cfg())?;
    let samples = match mode {
        SampleMode::ArcLength => curve.sample_uniform(count),
        SampleMode::Angle => curve.sample_angles(0.0, count),
    };
    let mut df = samples_frame(&curve, &samples)?;
    write_table(&mut df, out)?;
    tracing::info!(rows = df.height(), out = %out.display(), mode = ?mode, "samples written");
    let params = json!({
        "spec": format!("{spec:?}"),
        "count": count,
        "mode": format!("{mode:?}"),
        "cfg": tol.params(),
    });
    write_sidecar(out, Payload::new(params, foci_args.source()))?;
    Ok(())
}

fn sweep_rows(foci: &[Point], specs: &[LoopSpec], cfg: &CurveCfg) -> Vec<SweepRow> {
    specs
        .iter()
        .zip(build_curves(foci, specs, cfg))
        .map(|(spec, res)| match res {
            Ok(c) => SweepRow {
                spec: format!("{spec:?}"),
                loop_length: Some(c.loop_length()),
                arcs: Some(c.len()),
                total_length: Some(c.total_length()),
                area: Some(c.area()),
                error: None,
            },
            Err(err) => SweepRow {
                spec: format!("{spec:?}"),
                loop_length: None,
                arcs: None,
                total_length: None,
                area: None,
                error: Some(err.to_string()),
            },
        })
        .collect()
}

fn sweep(
    foci_args: &FociArgs,
    tol: TolArgs,
    slack_min: f64,
    slack_max: f64,
    steps: usize,
    out: Option<PathBuf>,
) -> Result<()> {
    let foci = foci_args.load()?;
    let specs = slack_range(slack_min, slack_max, steps);
    let rows = sweep_rows(&foci, &specs, &tol.cfg());
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }
    if let Some(out) = out {
        let mut df = df!(
            "spec" => rows.iter().map(|r| r.spec.clone()).collect::<Vec<_>>(),
            "loop_length" => rows.iter().map(|r| r.loop_length).collect::<Vec<_>>(),
            "arcs" => rows.iter().map(|r| r.arcs.map(|a| a as u32)).collect::<Vec<_>>(),
            "total_length" => rows.iter().map(|r| r.total_length).collect::<Vec<_>>(),
            "area" => rows.iter().map(|r| r.area).collect::<Vec<_>>(),
            "error" => rows.iter().map(|r| r.error.clone()).collect::<Vec<_>>()
        )?;
        write_table(&mut df, &out)?;
        let params = json!({
            "slack_min": slack_min,
            "slack_max": slack_max,
            "steps": steps,
            "cfg": tol.params(),
        });
        write_sidecar(&out, Payload::new(params, foci_args.source()))?;
        tracing::info!(rows = df.height(), out = %out.display(), "sweep written");
    }
    Ok(())
}

fn report() -> Result<()> {
    let cfg = CurveCfg::default();
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": gardener::VERSION,
        "parallel": cfg!(feature = "parallel"),
        "defaults": {
            "eps_dedup": cfg.eps_dedup,
            "eps_collinear": cfg.eps_collinear,
            "eps_root": cfg.eps_root,
            "max_iterations": cfg.max_iterations,
            "eps_junction": cfg.eps_junction,
            "eps_tangent": cfg.eps_tangent,
            "eps_length": cfg.eps_length,
            "length_probes": cfg.length_probes,
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
