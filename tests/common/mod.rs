#![allow(dead_code)]

pub mod command;
pub mod file;

// Helper function to create hexdump representation
pub fn to_hexdump(data: &[u8]) -> String {
    let mut result = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        result.push_str(&format!("{:08x}: ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                result.push(' ');
            }
            result.push_str(&format!("{:02x} ", byte));
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            if j == 8 {
                result.push(' ');
            }
            result.push_str("   ");
        }

        result.push_str(" |");
        for byte in chunk {
            if byte.is_ascii_graphic() {
                result.push(*byte as char);
            } else {
                result.push('.');
            }
        }
        result.push_str("|\n");
    }
    result
}

/// Compare two index files, showing a hexdump diff on failure
#[macro_export]
macro_rules! assert_index_eq {
    ($plumb_content:expr, $git_content:expr) => {
        if $plumb_content != $git_content {
            pretty_assertions::assert_eq!(
                common::to_hexdump($plumb_content),
                common::to_hexdump($git_content),
                "\n=== INDEX CONTENTS DIFFER ===\nplumb index ({} bytes) vs git index ({} bytes)",
                $plumb_content.len(),
                $git_content.len()
            );
        }
    };
}

/// Whether a `git` executable is available for cross-checking
pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}
