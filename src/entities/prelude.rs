pub use super::blog_posts::Entity as BlogPosts;
pub use super::contact_inquiries::Entity as ContactInquiries;
pub use super::projects::Entity as Projects;
pub use super::settings::Entity as Settings;
pub use super::team_members::Entity as TeamMembers;
pub use super::users::Entity as Users;
