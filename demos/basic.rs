use tweet_vectorizer::{
    FeatureExtractor, InputRow, TweetCentroidModel, TweetTokenizer, TwoPhaseVectorizer,
};

fn main() {
    // a tiny unlabelled corpus
    let corpus = vec![
        InputRow::new("good morning everyone"),
        InputRow::new("what a good game"),
        InputRow::new("bad traffic again"),
        InputRow::new("good good good"),
    ];

    // word centroids over word unigrams
    let model = TweetCentroidModel::new(
        Box::new(TweetTokenizer::new()),
        FeatureExtractor::new(),
    )
    .with_min_inst_docs(2);

    let state = model.train(&corpus).expect("training failed");
    let words = model.word_vectors(&state);
    println!("word vectors:\n{:#?}", words);

    // map a held-out batch through the frozen dictionary
    let held_out = vec![InputRow::new("good unseen words")];
    let mapped = model.apply(&held_out, &state).expect("mapping failed");
    println!("held-out batch:\n{:#?}", mapped);
    println!("columns: {}", mapped.n_cols());
}
