use std::{ fs::{ self, File }, path::PathBuf };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use ehrenfest::{
    Config,
    Horizon,
    SimulationParams,
    analysis::{ Crossing, crossings, derivative },
    sim::Simulation,
};

// a free particle kicked toward the right wall; the classical particle bounces
// back and forth with period 2 l / v while the quantum packet slowly spreads

const L: f64 = 1.0;
const MASS: f64 = 50.0;
const X0: f64 = 0.3;
const SIGMA: f64 = 0.03;
const VELOCITY: f64 = 1.0;
const K: u32 = 96;

fn main() -> anyhow::Result<()> {
    ehrenfest::setup();
    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;

    let config = Config::default()
        .with_samples(4000)
        .with_horizon(Horizon::Fixed(8.0));
    let params
        = SimulationParams::new(L, MASS, K, X0, 0.0, SIGMA)
        .with_momentum(MASS * VELOCITY);
    let sim = Simulation::build(&params, &config)?;
    println!("captured norm fraction: {:.9}", sim.captured());

    let res = sim.results()?;
    let pq: nd::Array1<f64> = sim.quantum_momenta()?;
    let vq: nd::Array1<f64> = derivative(&res.time_points, &res.quantum_positions)?;
    let ehrenfest_err
        = vq.iter().zip(&pq)
        .map(|(v, p)| (v - p / MASS).abs())
        .fold(0.0, f64::max);
    println!("max |d<x>/dt - <p>/m| = {:.3e}", ehrenfest_err);

    let mid = L / 2.0;
    let tc = crossings(&res.time_points, &res.classical_positions, mid, Crossing::All)?;
    let tq = crossings(&res.time_points, &res.quantum_positions, mid, Crossing::All)?;
    println!("midpoint crossings (classical):");
    tc.iter().for_each(|t| println!("  {:.6}", t));
    println!("midpoint crossings (quantum):");
    tq.iter().for_each(|t| println!("  {:.6}", t));

    let mut npz = NpzWriter::new(File::create(outdir.join("box_bounce.npz"))?);
    npz.add_array("t", &res.time_points)?;
    npz.add_array("xq", &res.quantum_positions)?;
    npz.add_array("xc", &res.classical_positions)?;
    npz.add_array("pq", &pq)?;
    npz.finish()?;

    println!("done");
    Ok(())
}
