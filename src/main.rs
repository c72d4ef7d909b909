use clap::Parser;

use log::{error, info};
use std::process::ExitCode;

use voc2yolo::labels::LabelMap;
use voc2yolo::utils::read_manifest;
use voc2yolo::visualize::render_sample;
use voc2yolo::{
    center_to_corner, corner_to_center, prepare_dataset, Cli, Command, ConvertArgs, Error,
    Palette, Result, Scalar, ShowArgs,
};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Prepare(args) => {
            info!("Starting the dataset preparation...");
            prepare_dataset(&args)
        }
        Command::Convert(args) => convert(args),
        Command::Show(args) => show(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn six_values(values: Vec<Scalar>) -> Result<[Scalar; 6]> {
    values
        .try_into()
        .map_err(|values: Vec<Scalar>| {
            Error::Argument(format!("expected 6 values, got {}", values.len()))
        })
}

fn convert(args: ConvertArgs) -> Result<()> {
    match args {
        ConvertArgs::ToCenter { values } => {
            let [x_min, y_min, x_max, y_max, width, height] = six_values(values)?;
            let center = corner_to_center(x_min, y_min, x_max, y_max, width, height)?;
            println!("{} {} {} {}", center.x_c, center.y_c, center.w, center.h);
        }
        ConvertArgs::ToCorner { values } => {
            let [x_c, y_c, w, h, width, height] = six_values(values)?;
            let corners = center_to_corner(x_c, y_c, w, h, width, height)?;
            println!(
                "{} {} {} {}",
                corners.x_min, corners.y_min, corners.x_max, corners.y_max
            );
        }
    }
    Ok(())
}

fn show(args: &ShowArgs) -> Result<()> {
    let entries = read_manifest(&args.manifest)?;
    let label_map = LabelMap::from_samples([&entries]);
    let (image_path, sample) = entries.get(args.index).ok_or_else(|| {
        Error::Argument(format!(
            "index {} is out of range for {} samples",
            args.index,
            entries.len()
        ))
    })?;

    render_sample(
        image_path,
        sample,
        &label_map,
        &Palette::default(),
        args.thickness,
        &args.output,
    )
}
