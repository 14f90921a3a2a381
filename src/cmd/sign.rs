use cinemaos::signer;

pub fn cmd_sign(
    tmdb: Option<String>,
    imdb: Option<String>,
    season: Option<u32>,
    episode: Option<u32>,
    verbose: bool,
) {
    let season = season.map(|s| s.to_string());
    let episode = episode.map(|e| e.to_string());
    let fields = (
        tmdb.as_deref(),
        imdb.as_deref(),
        season.as_deref(),
        episode.as_deref(),
    );

    if verbose {
        eprintln!(
            "content: {}",
            signer::content_string(fields.0, fields.1, fields.2, fields.3)
        );
    }
    println!("{}", signer::sign(fields.0, fields.1, fields.2, fields.3));
}
