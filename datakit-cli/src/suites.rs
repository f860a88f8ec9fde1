//! Suite registry and runner.

mod bitmap;
mod codec;
mod wheel;

use crate::harness::{
    Checks,
    Suite,
};

/// Every registered suite, in display order.
pub const SUITES: &[Suite] = &[
    Suite {
        name: "codec-varint",
        run: codec::varint,
    },
    Suite {
        name: "codec-delta",
        run: codec::delta,
    },
    Suite {
        name: "codec-for",
        run: codec::frame,
    },
    Suite {
        name: "codec-pfor",
        run: codec::patched,
    },
    Suite {
        name: "codec-dict",
        run: codec::dict,
    },
    Suite {
        name: "codec-bitmap",
        run: codec::bitmap,
    },
    Suite {
        name: "codec-tagged",
        run: codec::tagged,
    },
    Suite {
        name: "codec-adaptive",
        run: codec::adaptive,
    },
    Suite {
        name: "bitmap-ops",
        run: bitmap::ops,
    },
    Suite {
        name: "bitmap-ranges",
        run: bitmap::ranges,
    },
    Suite {
        name: "bitmap-boolean",
        run: bitmap::boolean,
    },
    Suite {
        name: "bitmap-wire",
        run: bitmap::wire,
    },
    Suite {
        name: "wheel-oneshot",
        run: wheel::oneshot,
    },
    Suite {
        name: "wheel-repeat",
        run: wheel::repeat,
    },
    Suite {
        name: "wheel-cancel",
        run: wheel::cancel,
    },
    Suite {
        name: "wheel-stores",
        run: wheel::stores,
    },
];

/// Print the registry, optionally as JSON.
pub fn list(json: bool) {
    if json {
        let names: Vec<&str> = SUITES.iter().map(|suite| suite.name).collect();
        println!(
            "{}",
            serde_json::to_string(&names).expect("suite names serialize")
        );
    } else {
        for suite in SUITES {
            println!("{}", suite.name);
        }
    }
}

/// Run the named suites (`ALL` expands to every suite). Returns the number
/// of failed suites, or the first unknown name.
pub fn run(names: &[String]) -> Result<i32, String> {
    let selected: Vec<&Suite> = if names.iter().any(|name| name == "ALL") {
        SUITES.iter().collect()
    } else {
        names
            .iter()
            .map(|name| {
                SUITES
                    .iter()
                    .find(|suite| suite.name == *name)
                    .ok_or_else(|| name.clone())
            })
            .collect::<Result<_, _>>()?
    };

    let mut failed = 0;
    for suite in &selected {
        let mut checks = Checks::default();
        (suite.run)(&mut checks);
        if checks.ok() {
            println!("PASS {} ({} checks)", suite.name, checks.passed());
        } else {
            failed += 1;
            println!(
                "FAIL {} ({} passed, {} failed)",
                suite.name,
                checks.passed(),
                checks.failures().len()
            );
            for failure in checks.failures() {
                println!("     {failure}");
            }
        }
    }
    println!(
        "{} suites, {} failed",
        selected.len(),
        failed
    );
    Ok(failed)
}
