//! Membership operations: enrolment, field edits, the extend/cancel
//! lifecycle, expiry and removal.

use tracing::{info, warn};

use crate::error::{BookwormError, Result};
use crate::library::Library;
use crate::model::{Member, MemberId, MemberUpdate, MembershipType, NewMember};
use crate::notify::Notice;

impl Library {
    /// Enrols a member joining now. The expiry follows from the membership
    /// type and the member starts out active.
    ///
    /// Fails with a validation error when the membership number is already
    /// taken.
    pub fn add_member(&mut self, new_member: NewMember) -> Result<Member> {
        if self.find_member_by_number(&new_member.membership_number).is_some() {
            return self.reject(BookwormError::Validation(format!(
                "membership number {} is already in use",
                new_member.membership_number
            )));
        }
        let join_date = self.now();
        let expiry_date = match new_member.membership_type.expiry_from_join(join_date) {
            Some(expiry_date) => expiry_date,
            None => {
                return self.reject(BookwormError::Invariant(format!(
                    "expiry out of range for join date {join_date}"
                )));
            }
        };
        let id = MemberId(self.store.generate_id());
        let member = Member {
            id,
            membership_number: new_member.membership_number,
            name: new_member.name,
            email: new_member.email,
            phone: new_member.phone,
            address: new_member.address,
            membership_type: new_member.membership_type,
            join_date,
            expiry_date,
            active: true,
        };
        let (kept, _) = self.store.members.keep(member);
        let member = kept.clone();
        info!(member = %member.id, number = %member.membership_number, expires = %member.expiry_date, "member added");
        self.notify(Notice::success(format!("Member \"{}\" added successfully", member.name)));
        Ok(member)
    }

    /// Applies the updates in order, all or nothing. Returns `Ok(None)` when
    /// the id is unknown.
    pub fn update_member(
        &mut self,
        id: MemberId,
        updates: Vec<MemberUpdate>,
    ) -> Result<Option<Member>> {
        let Some(current) = self.store.members.get(&id) else {
            return Ok(None);
        };
        // work on a copy so a rejected update leaves the member untouched
        let mut member = current.clone();
        let mut notice = Notice::success("Member updated successfully");
        for update in updates {
            match update {
                MemberUpdate::Name(name) => member.name = name,
                MemberUpdate::Email(email) => member.email = email,
                MemberUpdate::Phone(phone) => member.phone = phone,
                MemberUpdate::Address(address) => member.address = address,
                MemberUpdate::MembershipType(membership_type) => {
                    member.membership_type = membership_type
                }
                MemberUpdate::MembershipNumber(number) => {
                    let taken = self
                        .store
                        .members
                        .iter()
                        .any(|other| other.id != id && other.membership_number == number);
                    if taken {
                        return self.reject(BookwormError::Validation(format!(
                            "membership number {number} is already in use"
                        )));
                    }
                    member.membership_number = number;
                }
                MemberUpdate::Extend(membership_type) => {
                    let Some(expiry_date) = membership_type.extend(member.expiry_date) else {
                        return self.reject(BookwormError::Invariant(format!(
                            "cannot extend expiry {}",
                            member.expiry_date
                        )));
                    };
                    member.expiry_date = expiry_date;
                    member.active = true;
                    notice = Notice::success(format!(
                        "Membership extended until {}",
                        expiry_date.format("%B %-d, %Y")
                    ));
                }
                MemberUpdate::Cancel => {
                    member.active = false;
                    notice = Notice::success("Membership has been canceled");
                }
            }
        }
        if let Some(kept) = self.store.members.get_mut(&id) {
            *kept = member.clone();
        }
        info!(member = %id, active = member.active, expires = %member.expiry_date, "member updated");
        self.notify(notice);
        Ok(Some(member))
    }

    /// Adds the tier's duration to the current expiry and reactivates.
    pub fn extend_membership(
        &mut self,
        id: MemberId,
        membership_type: MembershipType,
    ) -> Result<Option<Member>> {
        self.update_member(id, vec![MemberUpdate::Extend(membership_type)])
    }

    pub fn cancel_membership(&mut self, id: MemberId) -> Result<Option<Member>> {
        self.update_member(id, vec![MemberUpdate::Cancel])
    }

    /// Removes a member, provided none of their loans is still open.
    pub fn delete_member(&mut self, id: MemberId) -> Result<Member> {
        if !self.store.members.contains(&id) {
            return self.reject(BookwormError::MemberNotFound(id));
        }
        let open = self
            .store
            .transactions
            .iter()
            .filter(|t| t.member_id == id && t.is_open())
            .count();
        if open > 0 {
            warn!(member = %id, open, "refusing to delete member with open loans");
            return self.reject(BookwormError::OpenTransactions { member: id, open });
        }
        match self.store.members.remove(&id) {
            Some(member) => {
                info!(member = %id, "member deleted");
                self.notify(Notice::success("Member deleted successfully"));
                Ok(member)
            }
            None => self.reject(BookwormError::MemberNotFound(id)),
        }
    }

    /// Deactivates every active member whose expiry is not in the future and
    /// returns their ids. Only extension brings them back.
    pub fn expire_memberships(&mut self) -> Vec<MemberId> {
        let now = self.now();
        let mut expired = Vec::new();
        for member in self.store.members.iter_mut() {
            if member.active && member.expiry_date <= now {
                member.active = false;
                expired.push(member.id);
            }
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "memberships expired");
            self.notify(Notice::info(format!("{} membership(s) expired", expired.len())));
        }
        expired
    }

    pub fn find_member_by_number(&self, membership_number: &str) -> Option<&Member> {
        self.store
            .members
            .iter()
            .find(|member| member.membership_number == membership_number)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.store.members.get(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.store.members.iter()
    }
}

