//! Team

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::User;
use crate::{
    codec::{coerce_list, decode, Item, JsonModel},
    error::{Error, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: String,

    /// Kept raw, see [`TeamMember::user`].
    pub user: Value,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Value>,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payouts_split: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<i64>,
}

impl JsonModel for TeamMember {}

impl TeamMember {
    pub fn user(&self) -> Result<User> {
        User::from_json(self.user.clone())
    }
}

/// Members sharing one team id.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: String,
    members: Vec<TeamMember>,
}

impl Team {
    /// Fails with [`Error::InvalidParam`] when `items` is empty or the members
    /// don't share a team id.
    pub fn new(items: impl IntoIterator<Item = Item<TeamMember>>) -> Result<Self> {
        let members = coerce_list(items, TeamMember::from_json)?;

        let id = match members.first() {
            Some(first) => first.team_id.clone(),
            None => return Err(Error::InvalidParam("a team needs at least one member".to_owned())),
        };

        if let Some(stray) = members.iter().find(|m| m.team_id != id) {
            return Err(Error::InvalidParam(format!(
                "member of team {} given to team {id}",
                stray.team_id
            )));
        }

        Ok(Self { id, members })
    }

    /// Splits a flat member listing into teams, in order of first appearance.
    pub fn group(members: Vec<TeamMember>) -> Vec<Team> {
        let mut teams: Vec<Team> = Vec::new();
        for member in members {
            match teams.iter_mut().find(|t| t.id == member.team_id) {
                Some(team) => team.members.push(member),
                None => teams.push(Team {
                    id: member.team_id.clone(),
                    members: vec![member],
                }),
            }
        }
        teams
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn from_json(value: Value) -> Result<Self> {
        let members: Vec<Value> = decode(value)?;
        Self::new(members.into_iter().map(Item::Raw))
    }

    pub fn to_json(&self) -> Result<Value> {
        let members = self
            .members
            .iter()
            .map(|m| m.to_json().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(members))
    }
}

impl IntoIterator for Team {
    type Item = TeamMember;
    type IntoIter = std::vec::IntoIter<TeamMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn member(team_id: &str, username: &str) -> Value {
        json!({
            "team_id": team_id,
            "user": {
                "username": username,
                "id": format!("id-{username}"),
                "created": "2020-01-01T00:00:00Z",
                "role": "developer"
            },
            "role": "Owner",
            "permissions": null,
            "accepted": true,
            "payouts_split": null,
            "ordering": 0
        })
    }

    #[test]
    fn round_trip() {
        let raw = json!([member("t1", "alice"), member("t1", "bob")]);
        let team = Team::from_json(raw).unwrap();

        assert_eq!("t1", team.id());
        assert_eq!(2, team.len());
        assert_eq!("bob", team.members()[1].user().unwrap().username);

        let written = team.to_json().unwrap();
        assert!(written[0].get("permissions").is_none());
        assert_eq!(team, Team::from_json(written).unwrap());
    }

    #[test]
    fn empty_team() {
        assert!(matches!(
            Team::from_json(json!([])),
            Err(Error::InvalidParam(_))
        ));
    }

    #[test]
    fn mixed_teams() {
        let raw = json!([member("t1", "alice"), member("t2", "bob")]);
        assert!(matches!(Team::from_json(raw), Err(Error::InvalidParam(_))));
    }

    #[test]
    fn accepts_decoded_members() {
        let alice = TeamMember::from_json(member("t1", "alice")).unwrap();
        let bob = Item::Raw(member("t1", "bob"));
        let team = Team::new([Item::Decoded(alice.clone()), bob]).unwrap();
        assert_eq!(alice, team.members()[0]);
    }

    #[test]
    fn grouping_keeps_order() {
        let members = [
            member("t1", "a"),
            member("t2", "b"),
            member("t1", "c"),
        ]
        .into_iter()
        .map(|m| TeamMember::from_json(m).unwrap())
        .collect();

        let teams = Team::group(members);
        assert_eq!(2, teams.len());
        assert_eq!("t1", teams[0].id());
        assert_eq!(2, teams[0].len());
        assert_eq!("t2", teams[1].id());
    }
}
