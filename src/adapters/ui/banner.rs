//! ASCII startup banner with a teal-to-mint gradient (SPLITFAIR).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Deep Teal (#0b7285).
const DEEP_TEAL: (u8, u8, u8) = (0x0b, 0x72, 0x85);
/// Mint Green (#63e6be).
const MINT_GREEN: (u8, u8, u8) = (0x63, 0xe6, 0xbe);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the welcome banner: "SPLITFAIR" in figlet's standard font with a
/// gradient from Deep Teal to Mint Green, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let Some(art) = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("SPLITFAIR").map(|figure| figure.to_string()))
    else {
        let _ = out.execute(Print("SPLITFAIR\r\n"));
        return;
    };
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(DEEP_TEAL, MINT_GREEN, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: MINT_GREEN.0,
        g: MINT_GREEN.1,
        b: MINT_GREEN.2,
    }));
    let _ = out.execute(Print(format!("v{}\r\n", version)));
    let _ = out.execute(Print("Fair splits, settled up\r\n"));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
