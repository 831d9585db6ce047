// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für die HM-10 Firmware auf dem ESP32-C6

fn main() {
    // Hinweise bei Linker-Fehlern
    linker_hints();

    // defmt.x - Symbole für das binäre Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // linkall.x - Flash/RAM-Layout und Startup-Code, muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Wird vom Linker als "--error-handling-script" erneut aufgerufen
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        let kind = &args[1]; // Fehler-Typ (z.B. "undefined-symbol")
        let what = &args[2]; // Symbol-Name

        if kind != "undefined-symbol" {
            std::process::exit(1);
        }

        match what.as_str() {
            what if what.starts_with("_defmt_") => {
                eprintln!();
                eprintln!(
                    "💡 `defmt` not found - make sure `defmt.x` is added as a linker script and `esp-println` has the `defmt-espflash` feature"
                );
                eprintln!();
            }
            "_stack_start" => {
                eprintln!();
                eprintln!("💡 Is the linker script `linkall.x` missing?");
                eprintln!();
            }
            what if what.starts_with("esp_rtos_") => {
                eprintln!();
                eprintln!("💡 `esp-rtos` was not started - call `esp_rtos::start()` in main");
                eprintln!();
            }
            _ => (),
        }

        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }
}
