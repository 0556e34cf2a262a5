use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Persist a frozen training state as CBOR.
///
/// Every model state in this crate (`CentroidState`, `PartitionedState`,
/// `AsaState`, `PmiState`, `LabellerState`) serializes losslessly, so a
/// training pass can be saved once and applied from other processes.
pub fn save_cbor<T, W>(state: &T, writer: W) -> Result<()>
where
    T: Serialize,
    W: Write,
{
    serde_cbor::to_writer(writer, state)?;
    Ok(())
}

/// Load a frozen training state saved by [`save_cbor`].
pub fn load_cbor<T, R>(reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    Ok(serde_cbor::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputRow;
    use crate::tokenize::TweetTokenizer;
    use crate::vectorizer::features::FeatureExtractor;
    use crate::vectorizer::models::{CentroidState, TweetCentroidModel, TwoPhaseVectorizer};

    #[test]
    fn centroid_state_round_trips() {
        let model = TweetCentroidModel::new(
            Box::new(TweetTokenizer::new()),
            FeatureExtractor::new(),
        );
        let state = model
            .train(&[
                InputRow::new("good good day"),
                InputRow::new("bad day"),
            ])
            .unwrap();

        let mut buffer = Vec::new();
        save_cbor(&state, &mut buffer).unwrap();
        let restored: CentroidState = load_cbor(buffer.as_slice()).unwrap();
        assert_eq!(state, restored);

        // the restored dictionary maps identically
        let held_out = [InputRow::new("good new words")];
        assert_eq!(
            model.apply(&held_out, &state).unwrap(),
            model.apply(&held_out, &restored).unwrap()
        );
    }
}
