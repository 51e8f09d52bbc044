//! Integration tests for the pipeline.
//!
//! These tests fuzzify a small catalog, profile a user from their ratings
//! and check that scoring and reranking work together.

use data_loader::{DataIndex, Gender, Genre, Movie, Rating, User};
use fuzzy::profiler::{build_user_profile, rated_movies};
use fuzzy::{FuzzyCatalog, FuzzyMovie, FuzzyProfile, GenreFuzzifier, GenreRelationships};
use pipeline::{
    CandidateScorer, DiversityReranker, ExclusionSet, SimilarityWeights, intra_list_diversity,
};

fn create_test_setup() -> (DataIndex, FuzzyCatalog) {
    let mut index = DataIndex::new();

    index.insert_user(User {
        id: 1,
        age: 29,
        gender: Gender::Male,
        occupation: "engineer".to_string(),
        zipcode: "94110".to_string(),
    });

    let movies = [
        (1, "Rated Comedy (1994)", vec![Genre::Comedy]),
        (2, "Rated Romance (1995)", vec![Genre::Comedy, Genre::Romance]),
        (3, "Rated Horror (1980)", vec![Genre::Horror]),
        (4, "Unseen Romantic Comedy (1996)", vec![Genre::Comedy, Genre::Romance]),
        (5, "Unseen Comedy (1997)", vec![Genre::Comedy]),
        (6, "Unseen War (1970)", vec![Genre::War]),
        (7, "Unseen Western (1965)", vec![Genre::Western]),
        (8, "Unseen Comedy Drama (1998)", vec![Genre::Comedy, Genre::Drama]),
    ];
    for (id, title, genres) in movies {
        index.insert_movie(Movie {
            id,
            title: title.to_string(),
            year: None,
            genres,
        });
    }

    // Loves comedies, dislikes horror
    for (movie_id, rating) in [(1, 5.0), (2, 4.0), (3, 1.0)] {
        index.insert_rating(Rating {
            user_id: 1,
            movie_id,
            rating,
            timestamp: 880000000 + movie_id as i64,
        });
    }

    // No relationship blending keeps the test catalog crisp
    let catalog = GenreFuzzifier::new(42)
        .with_relationships(GenreRelationships::empty())
        .fuzzify_catalog(index.movies_sorted());

    (index, catalog)
}

#[test]
fn test_full_pipeline() {
    let (index, catalog) = create_test_setup();
    let user = build_user_profile(&index, &catalog, 1).unwrap();
    let exclusions = rated_movies(&index, 1);

    let scorer = CandidateScorer::default();
    let ranked = scorer.score(&user.profile, catalog.as_slice(), &exclusions, 10);

    // Rated movies never come back
    assert_eq!(ranked.len(), 5);
    assert!(ranked.iter().all(|c| !exclusions.contains(&c.movie_id)));

    // Comedies rank above war and western movies, which share nothing
    let top: Vec<u32> = ranked.iter().take(3).map(|c| c.movie_id).collect();
    assert!(top.contains(&4));
    assert!(top.contains(&5));
    assert!(top.contains(&8));
    assert_eq!(ranked[3].similarity_score, 0.0);
    assert_eq!(ranked[4].similarity_score, 0.0);
    // Zero-score ties stay in catalog order
    assert_eq!(ranked[3].movie_id, 6);
    assert_eq!(ranked[4].movie_id, 7);
}

#[test]
fn test_candidate_genres_are_attached() {
    let (index, catalog) = create_test_setup();
    let user = build_user_profile(&index, &catalog, 1).unwrap();
    let ranked = CandidateScorer::default().score(
        &user.profile,
        catalog.as_slice(),
        &ExclusionSet::new(),
        10,
    );

    let romcom = ranked.iter().find(|c| c.movie_id == 4).unwrap();
    let labels: Vec<Genre> = romcom.genres.iter().map(|(g, _)| *g).collect();
    assert_eq!(labels.len(), 2);
    assert!(labels.contains(&Genre::Comedy));
    assert!(labels.contains(&Genre::Romance));
    for (_, strength) in &romcom.genres {
        assert!((0.7..=1.0).contains(strength));
    }
}

#[test]
fn test_rerank_raises_diversity() {
    let (index, catalog) = create_test_setup();
    let user = build_user_profile(&index, &catalog, 1).unwrap();
    let exclusions = rated_movies(&index, 1);

    let pool = CandidateScorer::default().score(&user.profile, catalog.as_slice(), &exclusions, 10);
    let relevance_only = DiversityReranker::new(0.0).unwrap().rerank(&pool, 3);
    let diverse = DiversityReranker::new(1.0).unwrap().rerank(&pool, 3);

    assert_eq!(relevance_only, pool[..3].to_vec());
    assert_eq!(diverse[0], pool[0]);
    assert!(intra_list_diversity(&diverse) >= intra_list_diversity(&relevance_only));
}

fn movie(id: u32, first: Genre, second: Genre) -> FuzzyMovie {
    let profile = FuzzyProfile::new().with(first, 1.0).with(second, 1.0);
    FuzzyMovie::new(id, format!("M{}", id), profile)
}

#[test]
fn test_diversity_prefers_disjoint_genres() {
    let catalog = vec![
        movie(1, Genre::Comedy, Genre::Drama),
        movie(2, Genre::Comedy, Genre::Drama),
        movie(3, Genre::Horror, Genre::War),
    ];
    let user: FuzzyProfile = [Genre::Comedy, Genre::Drama, Genre::Horror, Genre::War]
        .into_iter()
        .map(|genre| (genre, 1.0))
        .collect();

    let pool = CandidateScorer::default().score(&user, &catalog, &ExclusionSet::new(), 3);
    let picks = DiversityReranker::new(1.0).unwrap().rerank(&pool, 2);

    let ids: Vec<u32> = picks.iter().map(|c| c.movie_id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_jaccard_only_weights_rank_by_jaccard() {
    let (index, catalog) = create_test_setup();
    let user = build_user_profile(&index, &catalog, 1).unwrap();
    let weights =
        SimilarityWeights::from_map([("jaccard", 1.0), ("cosine", 0.0), ("dice", 0.0)]).unwrap();

    let ranked = CandidateScorer::new(weights).score(
        &user.profile,
        catalog.as_slice(),
        &ExclusionSet::new(),
        8,
    );
    for candidate in &ranked {
        let movie = catalog.get(candidate.movie_id).unwrap();
        assert_eq!(
            candidate.similarity_score,
            pipeline::fuzzy_jaccard(&user.profile, &movie.profile)
        );
    }
}
