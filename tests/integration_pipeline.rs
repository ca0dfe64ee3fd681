//! Integration tests: output pipeline + writers + domain decomposition
//!
//! These tests verify that one output step produces the same fields
//! whatever the traversal (sequential, parallel, overlapping partitions)
//! and whatever the set of writers.

use std::fs;

use blackoil_output::mesh::{self, CellGrid, Discretization, ElementContext, Simulation};
use blackoil_output::output::blackoil::FIELD_NAMES;
use blackoil_output::output::export::{CsvConfig, CsvWriter, MemoryWriter};
use blackoil_output::output::{
    BlackOilOutputModule, OutputConfiguration, OutputModule, OutputPipeline, ResultWriter,
};
use blackoil_output::physics::Phase;
use ndarray::Array2;
use tempfile::TempDir;

mod common;
use common::{assert_buffers_close, standard_pvt, varied_grid, RejectingWriter, ThresholdOverride};
use common::test_helpers::committed_snapshot;

fn sequential_reference(grid: &CellGrid, config: OutputConfiguration) -> MemoryWriter {
    let mut module = BlackOilOutputModule::new(grid, standard_pvt(), config);
    module.allocate(grid.num_global_dof());
    for element in grid.elements() {
        module.process(&element);
    }
    let mut writer = MemoryWriter::new();
    module.commit(&mut writer);
    writer
}

// =================================================================================================
// Traversal Equivalence
// =================================================================================================

#[test]
fn test_parallel_batch_equals_sequential() {
    let grid = varied_grid(Discretization::CellCentered, 257);
    let expected = sequential_reference(&grid, OutputConfiguration::default());

    let mut writer = MemoryWriter::new();
    {
        let _threshold = ThresholdOverride::set(1);
        let mut pipeline = OutputPipeline::new();
        pipeline.add_module(BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::default()));
        pipeline.run_step(&grid, &mut [&mut writer]);
    }

    assert_eq!(committed_snapshot(&writer), committed_snapshot(&expected));
}

#[test]
fn test_threshold_restored_after_failed_step() {
    let outcome = std::panic::catch_unwind(|| {
        let _threshold = ThresholdOverride::set(1);
        assert_eq!(mesh::parallel_threshold(), 1);
        panic!("step aborted");
    });
    assert!(outcome.is_err());

    let check = ThresholdOverride::set(2);
    assert_eq!(check.previous(), 999);
}

#[test]
fn test_overlapping_partitions_converge() {
    let grid = varied_grid(Discretization::CellCentered, 40);
    let expected = sequential_reference(&grid, OutputConfiguration::default());

    let mut module = BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::default());
    module.allocate(grid.num_global_dof());

    // later partitions overwrite the overlap with identical values
    for partition in grid.partitions(4, 3) {
        let batch: Vec<&(dyn ElementContext + Sync)> =
            partition.iter().map(|e| e as &(dyn ElementContext + Sync)).collect();
        module.process_elements(&batch);
    }
    let mut writer = MemoryWriter::new();
    module.commit(&mut writer);

    assert_eq!(committed_snapshot(&writer), committed_snapshot(&expected));
}

#[test]
fn test_partitions_in_reverse_order() {
    let grid = varied_grid(Discretization::CellCentered, 25);
    let expected = sequential_reference(&grid, OutputConfiguration::none().pressures(true));

    let mut module = BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::none().pressures(true));
    module.allocate(grid.num_global_dof());
    for partition in grid.partitions(3, 2).iter().rev() {
        for element in partition {
            module.process(element);
        }
    }

    let expected_oil = expected.get("PRESSURE").unwrap();
    assert_buffers_close(module.pressure(Phase::Oil), expected_oil, 0.0, "oil pressure");
}

// =================================================================================================
// Writers
// =================================================================================================

#[test]
fn test_rejecting_writer_does_not_block_others() {
    let grid = varied_grid(Discretization::CellCentered, 6);
    let mut pipeline = OutputPipeline::new();
    pipeline.add_module(BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::default()));

    let mut rejecting = RejectingWriter;
    let mut memory = MemoryWriter::new();
    pipeline.run_step(&grid, &mut [&mut rejecting, &mut memory]);

    assert_eq!(memory.names(), FIELD_NAMES.to_vec());
}

#[test]
fn test_csv_step_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("step_0001.csv");
    let grid = varied_grid(Discretization::CellCentered, 5);

    let mut pipeline = OutputPipeline::new();
    pipeline.add_module(BlackOilOutputModule::new(
        &grid,
        standard_pvt(),
        OutputConfiguration::none().pressures(true).saturations(true),
    ));

    let mut csv = CsvWriter::new(CsvConfig::default().precision(4));
    let mut memory = MemoryWriter::new();
    pipeline.run_step(&grid, &mut [&mut csv, &mut memory]);
    csv.write_step(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "dof,PRESSURE,PGAS,PWAT,SWAT,SGAS");
    assert_eq!(lines.len(), 1 + 5);

    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first[0], "0");
    assert_eq!(first[1], format!("{:.4}", memory.get("PRESSURE").unwrap()[0]));
    assert_eq!(first[4], format!("{:.4}", memory.get("SWAT").unwrap()[0]));
}

#[test]
fn test_writer_reused_across_steps() {
    let mut grid = varied_grid(Discretization::CellCentered, 3);
    let mut pipeline = OutputPipeline::new();
    pipeline.add_module(BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::none().pressures(true)));

    let mut writer = MemoryWriter::new();
    pipeline.run_step(&grid, &mut [&mut writer]);
    grid.fill_oil_pressure(2.0e7);
    pipeline.run_step(&grid, &mut [&mut writer]);

    assert_eq!(pipeline.steps(), 2);
    assert_eq!(writer.len(), 3);
    assert_eq!(writer.get("PRESSURE").unwrap().as_slice(), &[200.0; 3]);
}

// =================================================================================================
// End to End
// =================================================================================================

#[test]
fn test_solver_arrays_and_toml_configuration() {
    let n = 4;
    let mut pressure = Array2::<f64>::zeros((n, 3));
    let mut saturation = Array2::<f64>::zeros((n, 3));
    for i in 0..n {
        pressure.row_mut(i).fill(1.0e7 * (i + 1) as f64);
        saturation[[i, 0]] = 0.6;
        saturation[[i, 1]] = 0.1;
        saturation[[i, 2]] = 0.3;
    }
    let grid = CellGrid::from_arrays(Discretization::CellCentered, &pressure, &saturation, vec![0; n]).unwrap();

    let config = OutputConfiguration::from_toml_str(
        r#"
        [output]
        EclOutputWriteSaturations = false
        EclOutputWriteGasDissolutionFactor = false
        EclOutputWriteGasFormationVolumeFactor = false
        EclOutputWriteOilFormationVolumeFactor = false
        EclOutputWriteOilSaturationPressure = false
        "#,
    )
    .unwrap();

    let mut pipeline = OutputPipeline::new();
    pipeline.add_module(BlackOilOutputModule::new(&grid, standard_pvt(), config));
    let mut writer = MemoryWriter::new();
    pipeline.run_step(&grid, &mut [&mut writer]);

    assert_eq!(writer.names(), vec!["PRESSURE", "PGAS", "PWAT"]);
    assert_eq!(writer.get("PWAT").unwrap().as_slice(), &[100.0, 200.0, 300.0, 400.0]);
}

#[test]
fn test_vertex_centered_pipeline_writes_nothing() {
    let grid = varied_grid(Discretization::VertexCentered, 8);
    let mut pipeline = OutputPipeline::new();
    pipeline.add_module(BlackOilOutputModule::new(&grid, standard_pvt(), OutputConfiguration::default()));

    let mut writer = MemoryWriter::new();
    let writers: &mut [&mut dyn ResultWriter] = &mut [&mut writer];
    pipeline.run_step(&grid, writers);

    assert!(writer.is_empty());
}
