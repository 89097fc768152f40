mod movie;
mod session;

pub use movie::{Genre, GenreListResponse, Movie, MovieDetails, Page};
pub use session::{Intent, Session};
