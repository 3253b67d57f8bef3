use std::{ fs::{ self, File }, path::PathBuf };
use ndarray_npy::NpzWriter;
use ehrenfest::{ Config, Horizon, SimulationParams, run_with };

// a heavy particle dropped from rest onto the floor of a box, for a few basis
// sizes

const L: f64 = 1.0;
const MASS: f64 = 100.0;
const X0: f64 = 0.7;
const FORCE: f64 = 50.0;
const SIGMA: f64 = 0.04;
const BASIS_SIZES: [u32; 3] = [10, 40, 120];

fn main() -> anyhow::Result<()> {
    ehrenfest::setup();
    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;

    let config = Config::default()
        .with_samples(2000)
        .with_horizon(Horizon::Fixed(10.0));

    let mut npz = NpzWriter::new(File::create(outdir.join("box_drop.npz"))?);
    let mut wrote_classical = false;
    for k in BASIS_SIZES {
        let params = SimulationParams::new(L, MASS, k, X0, FORCE, SIGMA);
        let res = run_with(&params, &config)?;
        println!("k = {:>4}: max |<x> - x| = {:.3e}", k, res.max_deviation());
        if !wrote_classical {
            npz.add_array("t", &res.time_points)?;
            npz.add_array("xc", &res.classical_positions)?;
            wrote_classical = true;
        }
        npz.add_array(format!("xq_{}", k), &res.quantum_positions)?;
    }
    npz.finish()?;

    println!("done");
    Ok(())
}
