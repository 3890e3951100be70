use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two keys a participant answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKey {
    F,
    J,
}

impl ResponseKey {
    pub fn other(self) -> Self {
        match self {
            ResponseKey::F => ResponseKey::J,
            ResponseKey::J => ResponseKey::F,
        }
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKey::F => f.write_str("F"),
            ResponseKey::J => f.write_str("J"),
        }
    }
}

/// What the participant claims to have seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Present,
    Absent,
}

impl Response {
    pub fn is_present(self) -> bool {
        matches!(self, Response::Present)
    }
}

/// Key assignment for one session. Drawn once and then left alone so that
/// every track of the session is answered with the same hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMapping {
    present: ResponseKey,
    absent: ResponseKey,
}

impl ResponseMapping {
    pub fn new(present: ResponseKey) -> Self {
        Self {
            present,
            absent: present.other(),
        }
    }

    /// Coin flip between `F = yes` and `J = yes`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::new(ResponseKey::F)
        } else {
            Self::new(ResponseKey::J)
        }
    }

    pub fn interpret(&self, key: ResponseKey) -> Response {
        if key == self.present {
            Response::Present
        } else {
            Response::Absent
        }
    }

    pub fn key_for(&self, response: Response) -> ResponseKey {
        match response {
            Response::Present => self.present,
            Response::Absent => self.absent,
        }
    }

    /// Accepted keys, "present" first.
    pub fn choices(&self) -> [ResponseKey; 2] {
        [self.present, self.absent]
    }

    /// Prompt shown under the response screen. Keys are listed F before J.
    pub fn prompt(&self) -> String {
        match self.present {
            ResponseKey::F => format!("Yes [{}] or no [{}]", self.present, self.absent),
            ResponseKey::J => format!("No [{}] or yes [{}]", self.absent, self.present),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn mapping_is_unambiguous() {
        for present in [ResponseKey::F, ResponseKey::J] {
            let mapping = ResponseMapping::new(present);
            assert_eq!(mapping.interpret(present), Response::Present);
            assert_eq!(mapping.interpret(present.other()), Response::Absent);
            assert_eq!(mapping.key_for(Response::Present), present);
            assert_eq!(mapping.key_for(Response::Absent), present.other());
            assert_eq!(mapping.choices(), [present, present.other()]);
        }
    }

    #[test]
    fn prompt_lists_f_first() {
        assert_eq!(
            ResponseMapping::new(ResponseKey::F).prompt(),
            "Yes [F] or no [J]"
        );
        assert_eq!(
            ResponseMapping::new(ResponseKey::J).prompt(),
            "No [F] or yes [J]"
        );
    }

    #[test]
    fn random_mapping_uses_both_assignments() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<_> = (0..64).map(|_| ResponseMapping::random(&mut rng)).collect();
        assert!(draws.iter().any(|m| m.key_for(Response::Present) == ResponseKey::F));
        assert!(draws.iter().any(|m| m.key_for(Response::Present) == ResponseKey::J));
    }

    #[test]
    fn random_mapping_is_reproducible() {
        let a = ResponseMapping::random(&mut StdRng::seed_from_u64(42));
        let b = ResponseMapping::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
