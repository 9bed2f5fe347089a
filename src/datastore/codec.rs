//! Mapping between typed records and stored entities.

use uuid::Uuid;

use super::repo_types::{Interest, Message, User, UserMarker};
use crate::store::{Entity, RecordError};

pub trait Record: Sized {
    const KIND: &'static str;

    fn to_entity(&self) -> Entity;
    fn from_entity(entity: &Entity) -> Result<Self, RecordError>;
}

impl Record for Message {
    const KIND: &'static str = "Message";

    fn to_entity(&self) -> Entity {
        let mut e = Entity::named(Self::KIND, self.id.to_string());
        if let Some(url) = &self.image_url {
            e.set("imageUrl", url.as_str());
        }
        e.set("user", self.user.as_str());
        e.set("text", self.text.as_str());
        e.set("timestamp", self.timestamp);
        e.set("recipient", self.recipient.as_str());
        e
    }

    fn from_entity(e: &Entity) -> Result<Self, RecordError> {
        Ok(Self {
            id: Uuid::parse_str(e.name()?)?,
            user: e.get_str("user")?.to_string(),
            text: e.get_str("text")?.to_string(),
            timestamp: e.get_i64("timestamp")?,
            recipient: e.get_str("recipient")?.to_string(),
            image_url: e.get_opt_str("imageUrl")?.map(str::to_string),
        })
    }
}

impl Record for User {
    const KIND: &'static str = "User";

    fn to_entity(&self) -> Entity {
        let mut e = Entity::named(Self::KIND, self.email.as_str());
        e.set("email", self.email.as_str());
        e.set("aboutMe", self.about_me.as_str());
        e
    }

    fn from_entity(e: &Entity) -> Result<Self, RecordError> {
        Ok(Self::new(
            e.get_opt_str("email")?.map(str::to_string),
            e.get_opt_str("aboutMe")?.map(str::to_string),
        ))
    }
}

impl Record for Interest {
    const KIND: &'static str = "Interest";

    fn to_entity(&self) -> Entity {
        let mut e = Entity::named(Self::KIND, self.email.as_str());
        e.set("email", self.email.as_str());
        e.set("interest", self.info.as_str());
        e
    }

    fn from_entity(e: &Entity) -> Result<Self, RecordError> {
        Ok(Self::new(
            e.get_opt_str("email")?.map(str::to_string),
            e.get_opt_str("interest")?.map(str::to_string),
        ))
    }
}

impl Record for UserMarker {
    const KIND: &'static str = "UserMarker";

    fn to_entity(&self) -> Entity {
        let mut e = Entity::new(Self::KIND);
        e.set("lat", self.lat);
        e.set("lng", self.lng);
        e.set("content", self.content.as_str());
        e.set("user", self.user.as_str());
        e
    }

    fn from_entity(e: &Entity) -> Result<Self, RecordError> {
        Ok(Self {
            lat: e.get_f64("lat")?,
            lng: e.get_f64("lng")?,
            content: e.get_str("content")?.to_string(),
            user: e.get_str("user")?.to_string(),
        })
    }
}
