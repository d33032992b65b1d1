use std::fs;
use std::path::PathBuf;

use argh::FromArgs;
use log::{debug, info, warn};

use nube::image::Image;
use nube::imgproc::{inpaint::fill_holes, recolor::recolor_nonempty};
use nube::io::png::write_image_png_rgb8;
use nube::n3d::io::ply::read_ply_binary;
use nube::n3d::ops::filter_by_depth_percentile;
use nube::projection::ortho::project_cloud;
use nube::projection::views::{render_view, ViewGrid};

#[derive(FromArgs)]
/// Convert point clouds into projected rasters and multi-view captures
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Project(ProjectArgs),
    Capture(CaptureArgs),
}

/// Project one point cloud onto a raster and fill the holes
#[derive(FromArgs)]
#[argh(subcommand, name = "project")]
struct ProjectArgs {
    /// path to an input point cloud (.ply)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// output directory for the color and mask rasters
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// index appended to the output file names
    #[argh(option, short = 'n', default = "0")]
    index: usize,

    /// percentile depth cut; the sign selects the kept side
    #[argh(option, default = "50.0")]
    cut_percentage: f64,

    /// world-to-pixel scale factor of the projection
    #[argh(option, default = "5.0")]
    scale_factor: f64,

    /// hole-filling iterations for the color raster
    #[argh(option, default = "1")]
    fill_iterations: usize,

    /// hole-filling iterations for the mask raster
    #[argh(option, default = "1")]
    mask_iterations: usize,

    /// only fill pixels with at least min-neighbors non-empty neighbors
    #[argh(switch)]
    preserve_borders: bool,

    /// non-empty neighbor threshold used with --preserve-borders
    #[argh(option, default = "4")]
    min_neighbors: usize,
}

/// Render every cloud in a directory from a grid of view orientations
#[derive(FromArgs)]
#[argh(subcommand, name = "capture")]
struct CaptureArgs {
    /// directory with input point clouds (.ply)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// output directory, one subdirectory per cloud
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// number of yaw samples over a full turn
    #[argh(option, default = "10")]
    num_yaw: usize,

    /// number of pitch samples
    #[argh(option, default = "5")]
    num_pitch: usize,

    /// number of roll samples
    #[argh(option, default = "5")]
    num_roll: usize,

    /// half-width of the pitch sweep, in degrees
    #[argh(option, default = "30.0")]
    pitch_range: f64,

    /// half-width of the roll sweep, in degrees
    #[argh(option, default = "30.0")]
    roll_range: f64,

    /// world-to-pixel scale factor of the projection
    #[argh(option, default = "5.0")]
    scale_factor: f64,
}

fn run_project(args: &ProjectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cloud = read_ply_binary(&args.input)?;
    info!("loaded {} points from {}", cloud.len(), args.input.display());

    let cloud = filter_by_depth_percentile(&cloud, args.cut_percentage);
    info!("{} points after the depth cut", cloud.len());

    let projected = project_cloud(&cloud, args.scale_factor)?;
    info!("projected raster size: {}", projected.size());

    let min_neighbors = if args.preserve_borders {
        args.min_neighbors
    } else {
        0
    };

    let mut color = Image::from_size_val(projected.size(), 0u8)?;
    let num_filled = fill_holes(&projected, &mut color, args.fill_iterations, min_neighbors)?;
    info!("filled {} pixels in the color raster", num_filled);

    let color_dir = args.output.join("color");
    fs::create_dir_all(&color_dir)?;
    let color_path = color_dir.join(format!("imagen_rellenada_{}.png", args.index));
    write_image_png_rgb8(&color_path, &color)?;
    info!("saved {}", color_path.display());

    // coverage mask: the projection recolored to white, then filled
    let mut mask = Image::from_size_val(projected.size(), 0u8)?;
    recolor_nonempty(&projected, &mut mask, [255, 255, 255])?;

    let mut mask_filled = Image::from_size_val(projected.size(), 0u8)?;
    let num_filled = fill_holes(&mask, &mut mask_filled, args.mask_iterations, min_neighbors)?;
    info!("filled {} pixels in the mask raster", num_filled);

    let mask_dir = args.output.join("mask");
    fs::create_dir_all(&mask_dir)?;
    let mask_path = mask_dir.join(format!("mask_{}.png", args.index));
    write_image_png_rgb8(&mask_path, &mask_filled)?;
    info!("saved {}", mask_path.display());

    Ok(())
}

fn run_capture(args: &CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cloud_paths = fs::read_dir(&args.input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ply"))
        })
        .collect::<Vec<_>>();
    cloud_paths.sort();

    if cloud_paths.is_empty() {
        warn!("no .ply files found in {}", args.input.display());
        return Ok(());
    }

    let grid = ViewGrid {
        num_yaw: args.num_yaw,
        num_pitch: args.num_pitch,
        num_roll: args.num_roll,
        pitch_range_deg: args.pitch_range,
        roll_range_deg: args.roll_range,
    };

    for path in &cloud_paths {
        let base_name = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };

        let cloud = read_ply_binary(path)?;
        if cloud.is_empty() {
            warn!("skipping empty cloud: {}", path.display());
            continue;
        }
        info!("capturing views for: {}", base_name);

        let cloud_dir = args.output.join(&base_name);
        fs::create_dir_all(&cloud_dir)?;

        for (seq, angles) in grid.orientations().enumerate() {
            let frame = render_view(&cloud, angles, args.scale_factor)?;
            let filename = format!(
                "frame_{:04}_pitch{:.1}_yaw{:.1}_roll{:.1}.png",
                seq,
                angles.pitch.to_degrees(),
                angles.yaw.to_degrees(),
                angles.roll.to_degrees()
            );
            let frame_path = cloud_dir.join(&filename);
            write_image_png_rgb8(&frame_path, &frame)?;
            debug!("saved {}", frame_path.display());
        }

        info!("saved {} frames to {}", grid.len(), cloud_dir.display());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    match args.command {
        Command::Project(ref project_args) => run_project(project_args),
        Command::Capture(ref capture_args) => run_capture(capture_args),
    }
}
