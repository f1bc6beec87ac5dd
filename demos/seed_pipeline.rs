//! Complete seed preparation workflow
//!
//! Set `RUST_LOG=rust_voronoi_seeds=debug` to follow every stage.

use ndarray::Array3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_voronoi_seeds::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Paint a sparse segmentation: one small blob per cell on a few z-slices
fn synthetic_segmentation(rng: &mut ChaCha8Rng, cells: u16) -> Array3<u16> {
    let shape = (12, 48, 48);
    let mut data = Array3::<u16>::zeros(shape);

    for label in 1..=cells {
        let cz = rng.gen_range(3..shape.0 - 3);
        let cy = rng.gen_range(4..shape.1 - 4);
        let cx = rng.gen_range(4..shape.2 - 4);
        for z in cz - 1..=cz + 1 {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    data[[z, y, x]] = label;
                }
            }
        }
    }
    data
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();

    println!("=== rust_voronoi_seeds Pipeline Demo ===\n");

    // Step 1: Segmentation
    println!("Step 1: Building a sparse segmentation...");
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let volume = LabelVolume::new(synthetic_segmentation(&mut rng, 8))?;
    println!("  Shape (Z, Y, X): {:?}", volume.shape());
    println!("  Labels: {:?}", volume.labels());
    println!("  Labeled voxels: {}", volume.labeled_count());

    // Step 2: Voronoi labeling
    println!("\nStep 2: Labeling the tissue mask...");
    let voronoi = VoronoiConfigBuilder::new()
        .dilation_iterations(4)?
        .dilation_connectivity(Connectivity::Face)
        .target_height(2)
        .build();
    let labeled = voronoi.label(&volume)?;
    println!("  Labeled voxels: {}", labeled.labeled_count());

    // Step 3: Lattice sampling
    println!("\nStep 3: Sampling on a hexagonal lattice...");
    let sampling = SamplingConfigBuilder::new()
        .grid(GridKind::Hex)
        .resolution(2.0)?
        .scale_xy(0.5)?
        .scale_z(1.0)?
        .coordinate_mode(CoordinateMode::Step)
        .build()?;
    println!(
        "  Increments: xy = {}, z = {}",
        sampling.increment_xy(),
        sampling.increment_z()
    );
    let samples = sampling.sample(&labeled)?;
    println!("  Samples: {} across {} ids", samples.len(), samples.ids().len());

    // Step 4: Cleanup
    println!("\nStep 4: Removing stray fragments and edge regions...");
    let validation = ValidationConfigBuilder::new()
        .unconnected_filter(FilterKind::Connectivity, 0.0)?
        .edge_filter(2, 1.0)?
        .build();
    let cleaned = RegionValidator::new(validation).validate(&samples);
    println!("  Remaining: {} across ids {:?}", cleaned.len(), cleaned.ids());

    // Step 5: Seeds
    println!("\nStep 5: Converting to simulation coordinates...");
    let seeds = sampling.scale(&cleaned)?;
    for (id, rows) in cleaned.group_by_id() {
        println!("  Cell {}: {} seed(s)", id, rows.len());
    }
    if let Some(first) = seeds.first() {
        println!("  First seed: id {} at {:?}", first.id, first.position);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
