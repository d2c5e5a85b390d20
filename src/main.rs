use clap::Command;
use log::LevelFilter;
use rsacrack::cmd::{Cmd, ScanCmd};

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("RSACRACK_VERSION_INFO");
    let app = Command::new("rsacrack")
        .version(version)
        .about("common-factor attack on corpora of weak RSA keypairs")
        .subcommand(ScanCmd::cmd())
        .get_matches();

    if let Some((s, m)) = app.subcommand() {
        match s {
            ScanCmd::NAME => ScanCmd::new().run(m),
            name => {
                panic!("unsupport for {}", name)
            }
        }
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), version);
    }
}
