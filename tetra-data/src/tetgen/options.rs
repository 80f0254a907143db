//! TetGen switch strings such as `pqa200`.

use crate::error::{DataError, DataResult};
use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

/// Quality bound requested with `q`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quality {
    /// Maximum radius-edge ratio.
    pub radius_edge: Option<f64>,
    /// Minimum dihedral angle in degrees.
    pub min_dihedral: Option<f64>,
}

/// Parsed TetGen switches.
///
/// The switches that shape the mesh are modelled as fields. Any other letter
/// of TetGen's alphabet (with its numeric suffix) is kept verbatim in
/// `passthrough` and handed to TetGen unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TetOptions {
    /// `p`: treat the input as a piecewise linear complex.
    pub plc: bool,
    /// `q`: refine until the quality bound holds.
    pub quality: Option<Quality>,
    /// `a<vol>`: global maximum tetrahedron volume.
    pub max_volume: Option<f64>,
    /// bare `a`: per-region volume constraints.
    pub region_volumes: bool,
    /// `Y`: do not split boundary facets.
    pub preserve_boundary: bool,
    /// `A`: assign region attributes.
    pub region_attributes: bool,
    /// `V`
    pub verbose: bool,
    /// `Q`
    pub quiet: bool,
    /// Remaining switches, e.g. `kO3`.
    pub passthrough: String,
}

impl TetOptions {
    /// Parse a switch string. A single leading `-` is allowed.
    pub fn parse(switches: &str) -> DataResult<Self> {
        let body = switches.trim();
        let body = body.strip_prefix('-').unwrap_or(body);

        let mut options = TetOptions::default();
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                'p' => options.plc = true,
                'q' => {
                    let radius_edge = take_number(&mut chars, 'q')?;
                    let min_dihedral = if chars.peek() == Some(&'/') {
                        chars.next();
                        take_number(&mut chars, 'q')?
                    } else {
                        None
                    };
                    options.quality = Some(Quality {
                        radius_edge,
                        min_dihedral,
                    });
                }
                'a' => match take_number(&mut chars, 'a')? {
                    Some(volume) if volume > 0.0 => options.max_volume = Some(volume),
                    Some(volume) => {
                        return Err(DataError::InvalidSwitches(format!(
                            "volume bound must be positive, got {}",
                            volume
                        )));
                    }
                    None => options.region_volumes = true,
                },
                'Y' => options.preserve_boundary = true,
                'A' => options.region_attributes = true,
                'V' => options.verbose = true,
                'Q' => options.quiet = true,
                other if other.is_ascii_alphabetic() => {
                    options.passthrough.push(other);
                    options.passthrough.push_str(&take_digits(&mut chars));
                }
                other => {
                    return Err(DataError::InvalidSwitches(format!(
                        "unsupported switch '{}' in \"{}\"",
                        other, switches
                    )));
                }
            }
        }
        Ok(options)
    }

    /// The `pqa200` preset: PLC input, default quality, volume capped at 200.
    pub fn quality_preset() -> Self {
        Self {
            plc: true,
            quality: Some(Quality::default()),
            max_volume: Some(200.0),
            ..Self::default()
        }
    }
}

// A number starts with a digit or '.', then may carry an exponent or sign,
// matching TetGen's own command-line scanner.
fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    if !matches!(chars.peek(), Some(c) if c.is_ascii_digit() || *c == '.') {
        return digits;
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+') {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    digits
}

fn take_number(chars: &mut Peekable<Chars<'_>>, switch: char) -> DataResult<Option<f64>> {
    let digits = take_digits(chars);
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|_| {
        DataError::InvalidSwitches(format!("bad number '{}' after '{}'", digits, switch))
    })
}

impl FromStr for TetOptions {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plc {
            f.write_str("p")?;
        }
        if let Some(quality) = self.quality {
            f.write_str("q")?;
            if let Some(ratio) = quality.radius_edge {
                write!(f, "{}", ratio)?;
            }
            if let Some(angle) = quality.min_dihedral {
                write!(f, "/{}", angle)?;
            }
        }
        if let Some(volume) = self.max_volume {
            write!(f, "a{}", volume)?;
        }
        if self.region_volumes {
            f.write_str("a")?;
        }
        if self.preserve_boundary {
            f.write_str("Y")?;
        }
        if self.region_attributes {
            f.write_str("A")?;
        }
        if self.verbose {
            f.write_str("V")?;
        }
        if self.quiet {
            f.write_str("Q")?;
        }
        f.write_str(&self.passthrough)
    }
}
