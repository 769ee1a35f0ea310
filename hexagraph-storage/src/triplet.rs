//! Triplets and their six lexicographic key encodings.
//!
//! Every edge `(subject, predicate, object)` is stored under six keys, one
//! per coordinate permutation, formatted `<tag>:<a>:<b>:<c>`. The tags
//! collate into six disjoint regions of the index, so a prefix-bounded
//! range scan over one region enumerates exactly the edges whose bound
//! coordinates match the prefix.

use crate::error::{Error, Result};

/// The fixed permutation order: `spo, sop, pso, pos, osp, ops`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permutation {
    Spo,
    Sop,
    Pso,
    Pos,
    Osp,
    Ops,
}

impl Permutation {
    pub const ALL: [Permutation; 6] = [
        Permutation::Spo,
        Permutation::Sop,
        Permutation::Pso,
        Permutation::Pos,
        Permutation::Osp,
        Permutation::Ops,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Permutation::Spo => "spo",
            Permutation::Sop => "sop",
            Permutation::Pso => "pso",
            Permutation::Pos => "pos",
            Permutation::Osp => "osp",
            Permutation::Ops => "ops",
        }
    }
}

/// One directed labelled edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triplet {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triplet {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// The single key encoding under the given permutation.
    pub fn permutation_key(&self, perm: Permutation) -> String {
        let (a, b, c) = match perm {
            Permutation::Spo => (&self.subject, &self.predicate, &self.object),
            Permutation::Sop => (&self.subject, &self.object, &self.predicate),
            Permutation::Pso => (&self.predicate, &self.subject, &self.object),
            Permutation::Pos => (&self.predicate, &self.object, &self.subject),
            Permutation::Osp => (&self.object, &self.subject, &self.predicate),
            Permutation::Ops => (&self.object, &self.predicate, &self.subject),
        };
        format!("{}:{}:{}:{}", perm.tag(), a, b, c)
    }

    /// All six key encodings, in the fixed permutation order.
    pub fn permutations(&self) -> [String; 6] {
        Permutation::ALL.map(|perm| self.permutation_key(perm))
    }

    /// Parses an index key back into the unpermuted triplet.
    pub fn parse(perm: Permutation, key: &[u8]) -> Result<Triplet> {
        let text = std::str::from_utf8(key)
            .map_err(|_| Error::MalformedKey(String::from_utf8_lossy(key).into_owned()))?;
        let mut parts = text.splitn(4, ':');
        let tag = parts.next();
        let (Some(a), Some(b), Some(c)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::MalformedKey(text.to_string()));
        };
        if tag != Some(perm.tag()) {
            return Err(Error::MalformedKey(text.to_string()));
        }
        let (subject, predicate, object) = match perm {
            Permutation::Spo => (a, b, c),
            Permutation::Sop => (a, c, b),
            Permutation::Pso => (b, a, c),
            Permutation::Pos => (c, a, b),
            Permutation::Osp => (b, c, a),
            Permutation::Ops => (c, b, a),
        };
        Ok(Triplet::new(subject, predicate, object))
    }
}

/// A partially bound triplet, as produced from a pattern edge during
/// traversal: `None` coordinates are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripletPattern {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

impl TripletPattern {
    /// The permutation whose tag puts every bound coordinate into a
    /// contiguous leading prefix.
    pub fn permutation(&self) -> Permutation {
        match (
            self.subject.is_some(),
            self.predicate.is_some(),
            self.object.is_some(),
        ) {
            (true, false, true) => Permutation::Sop,
            (false, true, false) => Permutation::Pso,
            (false, true, true) => Permutation::Pos,
            (false, false, true) => Permutation::Osp,
            _ => Permutation::Spo,
        }
    }

    /// The scan prefix: the tag followed by each bound coordinate, each
    /// terminated by `:`. A fully bound pattern renders the complete key.
    pub fn prefix(&self) -> Vec<u8> {
        let perm = self.permutation();
        let coords = match perm {
            Permutation::Spo => [&self.subject, &self.predicate, &self.object],
            Permutation::Sop => [&self.subject, &self.object, &self.predicate],
            Permutation::Pso => [&self.predicate, &self.subject, &self.object],
            Permutation::Pos => [&self.predicate, &self.object, &self.subject],
            Permutation::Osp => [&self.object, &self.subject, &self.predicate],
            Permutation::Ops => [&self.object, &self.predicate, &self.subject],
        };
        let mut prefix = format!("{}:", perm.tag()).into_bytes();
        let bound = coords.iter().filter(|c| c.is_some()).count();
        for (i, coord) in coords.iter().flat_map(|c| c.as_deref()).enumerate() {
            prefix.extend_from_slice(coord.as_bytes());
            if !(bound == 3 && i == 2) {
                prefix.push(b':');
            }
        }
        prefix
    }

    /// Inclusive range bounds for the scan: `[prefix, prefix ++ 0xFF]`,
    /// exploiting that `0xFF` is the largest byte.
    pub fn range_bounds(&self) -> (Vec<u8>, Vec<u8>) {
        let min = self.prefix();
        let mut max = min.clone();
        max.push(0xff);
        (min, max)
    }
}
