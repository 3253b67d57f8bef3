use std::{ fs::{ self, File }, path::PathBuf };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use ehrenfest::{ Config, SimulationParams, run_with, units };

// an electron in a 2 nm box under a uniform electric field

const LENGTH: f64 = 1e-9; // m
const BOX_WIDTH: f64 = 2e-9; // m
const SIGMA: f64 = 0.15e-9; // m
const FIELD: f64 = 5e7; // V m⁻¹
const K: u32 = 64;

fn main() -> anyhow::Result<()> {
    ehrenfest::setup();
    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;

    let uu = units::Units::from_mks(units::me, LENGTH);
    println!("energy unit: {:.6e} eV", uu.e / units::e);
    println!("time unit:   {:.6e} s", uu.t);
    println!("force unit:  {:.6e} N", uu.f);

    let l: f64 = uu.to_nat_length(BOX_WIDTH);
    let m: f64 = uu.to_nat_mass(units::me);
    let sigma: f64 = uu.to_nat_length(SIGMA);
    // potential energy e E x of the electron in the field
    let f: f64 = uu.to_nat_force(units::e * FIELD);
    println!("l = {:.3}, m = {:.3}, sigma = {:.3}, f = {:.3} (natural units)", l, m, sigma, f);

    let params = SimulationParams::new(l, m, K, l / 2.0, f, sigma);
    let res = run_with(&params, &Config::default())?;
    println!(
        "horizon: {:.6e} s; max |<x> - x| = {:.3e} m",
        uu.from_nat_time(res.time_points[res.len() - 1]),
        uu.from_nat_length(res.max_deviation()),
    );

    let t: nd::Array1<f64> = uu.from_nat_time(&res.time_points);
    let xq: nd::Array1<f64> = uu.from_nat_length(&res.quantum_positions);
    let xc: nd::Array1<f64> = uu.from_nat_length(&res.classical_positions);
    let mut npz = NpzWriter::new(File::create(outdir.join("electron_box.npz"))?);
    npz.add_array("t", &t)?;
    npz.add_array("xq", &xq)?;
    npz.add_array("xc", &xc)?;
    npz.finish()?;

    println!("done");
    Ok(())
}
