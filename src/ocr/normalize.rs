// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Cleanup of recurring engine misreads in label text

/// Substitutions applied to recognized block text, in order.
///
/// Care instructions mix French and Spanish accented characters that
/// the engine reliably misreads as punctuation on low-contrast prints.
const SUBSTITUTIONS: [(&str, &str); 4] = [("&", "À"), ("¢", "ç"), ("|", "l"), ("¢¢", "é")];

/// Apply the misread substitution table to recognized text.
///
/// Each mapping is applied once over the whole string, in table order.
pub fn normalize_recognized_text(text: &str) -> String {
    let mut out = text.to_string();
    for (misread, replacement) in SUBSTITUTIONS {
        out = out.replace(misread, replacement);
    }
    out
}
