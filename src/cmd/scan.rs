use super::Cmd;
use crate::corpus::load_corpus;
use crate::log_error;
use cipher::rsa::PrivateKey;
use cipher::CipherError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use scanner::{collate, KeyId, Pkcs1Decryptor, ScanObserver, Scanner};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Default)]
pub struct ScanCmd;

impl ScanCmd {
    pub fn new() -> Self {
        ScanCmd
    }
}

impl Cmd for ScanCmd {
    const NAME: &'static str = "scan";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("hunt shared prime factors across a directory of RSA keypairs")
            .arg(
                Arg::new("path")
                    .value_name("PATH")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(true)
                    .help("to specify the challenge data directory"),
            )
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("show the ciphertext and plaintext of every broken entry"),
            )
            .arg(
                Arg::new("save-keys")
                    .long("save-keys")
                    .short('s')
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("save the recovered RSA private keys next to the corpus"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let path = m
            .get_one::<PathBuf>("path")
            .cloned()
            .expect("path is required");
        let (verbose, save_keys) = (m.get_flag("verbose"), m.get_flag("save-keys"));

        let corpus = match load_corpus(&path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        };

        let mut reporter = Reporter {
            verbose,
            save_dir: save_keys.then(|| path.clone()),
        };

        if !verbose {
            print!("> Analyzing challenge data : ");
            let _ = std::io::stdout().flush();
        }

        let start = Instant::now();
        let results = match Scanner::new().scan(&corpus, &Pkcs1Decryptor, &mut reporter) {
            Ok(r) => r,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        };
        let elapsed = start.elapsed();

        let results = collate(results);
        if results.is_empty() {
            println!("\n!> No plaintext found");
            return;
        }

        if verbose {
            println!(">> Done in {:.2} second(s).", elapsed.as_secs_f64());
        } else {
            println!(". Done in {:.2} second(s).", elapsed.as_secs_f64());
        }

        println!(">> Found {} plaintext(s):", results.len());
        println!();
        for r in results.iter() {
            println!("'{}.bin' : {}", r.id, String::from_utf8_lossy(&r.plaintext));
        }
    }
}

// progress markers, verbose dumps and the optional key persistence
struct Reporter {
    verbose: bool,
    save_dir: Option<PathBuf>,
}

impl ScanObserver for Reporter {
    fn on_key_recovered(&mut self, id: KeyId, key: &PrivateKey) {
        let Some(dir) = self.save_dir.as_ref() else {
            return;
        };

        let path = dir.join(format!("{id}.key"));
        let res = serde_json::to_string_pretty(key)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
        let _ = log_error(res);
    }

    fn on_plaintext(&mut self, id: KeyId, ciphertext: &[u8], plaintext: &[u8]) {
        if !self.verbose {
            print!("#");
            let _ = std::io::stdout().flush();
            return;
        }

        println!("({id}.bin) Ciphertext :");
        println!("[[[");
        for chunk in ciphertext.chunks(24) {
            let line = chunk
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
        println!("]]]");
        println!();
        println!("({id}.bin) Plaintext : {}", String::from_utf8_lossy(plaintext));
    }

    fn on_decrypt_failed(&mut self, id: KeyId, err: &CipherError) {
        log::warn!("decrypting `{id}.bin` failed: {err}");
    }
}
