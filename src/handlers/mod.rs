pub mod post_submission;
