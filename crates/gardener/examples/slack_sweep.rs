//! Compare curves for one focus set at increasing slack.
//!
//! Usage:
//!   cargo run -p gardener --example slack_sweep
//!   cargo run -p gardener --example slack_sweep -- 7
//!
//! Prints, per slack, the arc count, traced perimeter and enclosed area.
//! The optional argument is the seed of the random focus cloud.

use gardener::api::{build_curves, draw_foci, slack_range, CurveCfg, FociCfg, ReplayToken};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2025);
    let foci = draw_foci(FociCfg::default(), ReplayToken { seed, index: 0 });
    println!("foci: {}", foci.len());
    let specs = slack_range(0.25, 4.0, 6);
    for (spec, curve) in specs.iter().zip(build_curves(&foci, &specs, &CurveCfg::default())) {
        match curve {
            Ok(c) => println!(
                "{spec:?}: arcs={}, own={}, length={:.6}, area={:.6}",
                c.len(),
                c.arcs().iter().filter(|a| a.is_own_arc()).count(),
                c.total_length(),
                c.area()
            ),
            Err(err) => println!("{spec:?}: {err}"),
        }
    }
}
