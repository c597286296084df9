use rand::seq::SliceRandom;

const COVER_IMAGES: &[&str] = &[
    "/adobe.png",
    "/amazon.png",
    "/facebook.png",
    "/hostinger.png",
    "/pinterest.png",
    "/quora.png",
    "/reddit.png",
    "/skype.png",
    "/spotify.png",
    "/telegram.png",
    "/tiktok.png",
    "/yahoo.png",
];

/// A uniformly random cover image path under `/covers`.
pub fn random_interview_cover() -> String {
    let cover = COVER_IMAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("/adobe.png");
    format!("/covers{cover}")
}
