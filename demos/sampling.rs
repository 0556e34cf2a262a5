use tweet_vectorizer::vectorizer::lexicon::WordPolarity;
use tweet_vectorizer::{
    AsaModel, FeatureExtractor, InputRow, PolarityLexicon, TweetTokenizer, TwoPhaseVectorizer,
};

fn main() {
    // seed lexicon
    let mut lexicon = PolarityLexicon::new();
    lexicon
        .insert_polarity("good", WordPolarity::Positive)
        .insert_polarity("happy", WordPolarity::Positive)
        .insert_polarity("bad", WordPolarity::Negative)
        .insert_polarity("sad", WordPolarity::Negative);

    // unlabelled corpus annotated by the lexicon
    let corpus = vec![
        InputRow::new("good morning so happy today"),
        InputRow::new("happy about the good news"),
        InputRow::new("bad day honestly"),
        InputRow::new("sad and bad weather"),
        InputRow::new("good game bad referee"),
        InputRow::new("nothing to report"),
    ];

    let model = AsaModel::new(
        Box::new(TweetTokenizer::new()),
        FeatureExtractor::new(),
        lexicon,
    )
    .with_num_instances(5, 5)
    .with_tweets_per_centroid(2)
    .with_random_seed(42);

    let state = model.train(&corpus).expect("training failed");
    println!(
        "pooled {} positive / {} negative documents",
        state.pools.positive().len(),
        state.pools.negative().len()
    );

    let synthetic = model.generate(&state).expect("generation failed");
    println!("synthetic instances:\n{:#?}", synthetic);

    // same seed, same matrix
    let again = model.generate(&state).expect("generation failed");
    assert_eq!(synthetic, again);
    println!("reproducible: yes");
}
