use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("cleanmate {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: cleanmate");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol_version: {}", cleanmate_frame::PROTOCOL_VERSION);
    println!("default_port: {}", cleanmate_transport::DEFAULT_PORT);
    println!(
        "build_target: {}",
        option_env!("CLEANMATE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("CLEANMATE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);

    Ok(SUCCESS)
}
