// SPDX-License-Identifier: AGPL-3.0-or-later
//! I/O parsers for the matroid corpus and attribute-file formats.

pub mod attributes;
pub mod corpus;
