//! Nonhomogeneous Wind Example - Curved Floating Bridge
//!
//! Runs the whole pipeline on a synthetic 5 km floating bridge: wind field
//! synthesis from 11 reference points, static response under the
//! nonhomogeneous and the equivalent homogeneous wind, and turbulence
//! intensities from a freshly built database.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use anyhow::{Context, Result};
use nonhomogeneous_wind::math::angles;
use nonhomogeneous_wind::prelude::*;

const N_G_NODES: usize = 51;
const N_REFERENCE: usize = 11;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Nonhomogeneous Wind Example: Curved Floating Bridge ===\n");

    let pontoons: Vec<f64> = (1..20).map(|i| i as f64 * 250.0).collect();
    let bridge = BridgeGeometry::curved(5000.0, 5000.0, N_G_NODES, 14.5, &pontoons, 0.0)?;
    let reference = bridge.reference_nodes(N_REFERENCE);
    let interpolator = ArcInterpolator::new(&reference, bridge.g_nodes(), bridge.arc_length)?;
    let synthesizer = WindFieldSynthesizer::new(interpolator.clone());

    // Weather model case: stronger wind in the middle of the fjord, veering
    // from 80° to 110° along the span
    let samples: Vec<f64> = (0..N_REFERENCE)
        .map(|i| 18.0 + 8.0 * (PI * i as f64 / (N_REFERENCE - 1) as f64).sin())
        .collect();
    let directions: Vec<f64> = (0..N_REFERENCE)
        .map(|i| (80.0 + 3.0 * i as f64).to_radians())
        .collect();

    let homogeneous_wind = LogProfileWind::new(25.0, 10.0, 0.01, 0.0);
    let u_hom = homogeneous_wind.mean_speed(bridge.g_nodes());
    let speed = synthesizer.mean_speed_single(&samples, &u_hom, NormalizationPolicy::Energy)?;
    let beta_0 = synthesizer.direction_field(&CaseField::from_row_slice(1, N_REFERENCE, &directions))?;
    let beta_0: Vec<f64> = beta_0.row(0).iter().copied().collect();

    println!("Wind field at {} girder nodes:", N_G_NODES);
    for node in [0, N_G_NODES / 4, N_G_NODES / 2, 3 * N_G_NODES / 4, N_G_NODES - 1] {
        println!(
            "  node {:2}: U={:.2}m/s, beta_0={:.1}°",
            node,
            speed[node],
            beta_0[node].to_degrees()
        );
    }
    if let Some(mean_dir) = angles::circular_mean(&beta_0) {
        println!("  mean direction: {:.1}°", mean_dir.to_degrees());
    }

    // Static response
    let frame = GirderFrame::default();
    let aero = QuasiSteadyAero::new(31.0, 3.5, AeroCoefficients::default(), bridge.g_nodes());
    let solver = StaticWindSolver::new(&bridge, &frame, &aero);
    let options = StaticWindOptions::default();

    let nw_wind = NodeWindState::new(speed.clone(), beta_0.clone(), vec![0.0; N_G_NODES])?;
    let nw = solver.solve(&nw_wind, &options).context("nonhomogeneous static solve")?;

    let speed_field = CaseField::from_row_slice(1, N_G_NODES, &speed);
    let eq = WindFieldSynthesizer::equivalent_homogeneous(&speed_field, NormalizationPolicy::Energy, &u_hom)?;
    let eq_dir = angles::circular_mean(&beta_0).unwrap_or(0.0);
    let hom_wind = NodeWindState::horizontal(eq.row(0).iter().copied().collect(), eq_dir)?;
    let hom = solver.solve(&hom_wind, &options).context("homogeneous static solve")?;

    println!("\nStatic response:");
    for (label, response) in [("nonhomogeneous", &nw), ("homogeneous", &hom)] {
        let summary = response.summary();
        println!(
            "  {:>14}: max |D|={:.4}m at node {}, max |DY|={:.4}m, max |RX|={:.6}rad",
            label,
            summary.max_displacement,
            summary.max_disp_node,
            summary.max_lateral,
            summary.max_torsion
        );
    }

    // Turbulence intensity database from synthetic predictions
    let store_dir = std::env::temp_dir().join("nw-example-intensities");
    let config = TurbulenceConfig::default().with_store_dir(&store_dir);
    let store = TurbulenceStore::new(&config.store_dir, config.artifacts.clone());
    let predictions = |scale: f64| -> Result<SectorTable> {
        let nodes: BTreeMap<usize, Vec<f64>> = (0..N_REFERENCE)
            .map(|n| {
                let iu = (0..SECTORS)
                    .map(|s| scale * (0.1 + 0.03 * (s as f64).to_radians().cos() + 0.002 * n as f64))
                    .collect();
                (n, iu)
            })
            .collect();
        Ok(SectorTable::new(nodes)?)
    };
    store.write_sector_table(&config.artifacts.ann_reference, &predictions(0.9)?)?;
    store.write_sector_table(&config.artifacts.en_reference, &predictions(1.0)?)?;
    store.write_sector_table(&config.artifacts.en_bridge, &predictions(1.2)?)?;

    let database = TurbulenceDatabase::initialize(&config, bridge.g_nodes(), &interpolator, IntensityModel::Ann, CachePolicy::Rebuild)?;
    let beta_db: Vec<f64> = beta_0
        .iter()
        .map(|b| angles::compass_from_beta_0(*b, 10f64.to_radians()))
        .collect();
    let intensities = database.intensities(&beta_db)?;

    println!("\nTurbulence intensities ({:?}):", database.model());
    for node in [0, N_G_NODES / 2, N_G_NODES - 1] {
        let [iu, iv, iw] = intensities[node];
        println!("  node {:2}: Iu={:.3}, Iv={:.3}, Iw={:.3}", node, iu, iv, iw);
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
