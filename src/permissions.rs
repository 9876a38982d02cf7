// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::types::user::Product;

/// Grants every other permission.
pub const SYSTEM_ADMIN: &str = "system.admin";

pub const USER_MANAGE: &str = "user.manage";
pub const GROUP_MANAGE: &str = "group.manage";
pub const ROLE_MANAGE: &str = "role.manage";
pub const PRODUCT_MANAGE: &str = "product.manage";

pub const PRODUCT_CARDS: &str = "Lernkarten";
pub const PRODUCT_IMAGES: &str = "Bilderverwaltung";
pub const PRODUCT_BOOKING_CARDS: &str = "Buchungskarten";
pub const PRODUCT_MATERIALS: &str = "Lernmaterial";
pub const PRODUCT_DMS: &str = "Card DMS";

/// The flat permission list of the current user.
#[derive(Clone, Default, Debug)]
pub struct Permissions {
    names: Vec<String>,
}

impl Permissions {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn is_admin(&self) -> bool {
        self.names.iter().any(|n| n == SYSTEM_ADMIN)
    }

    pub fn has(&self, name: &str) -> bool {
        self.is_admin() || self.names.iter().any(|n| n == name)
    }
}

/// The products the current user is entitled to.
#[derive(Clone, Default, Debug)]
pub struct Products {
    names: Vec<String>,
}

impl Products {
    pub fn new(products: &[Product]) -> Self {
        Self {
            names: products.iter().map(|p| p.name.clone()).collect(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Which menu entries are shown.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MenuVisibility {
    pub management: bool,
    pub user_management: bool,
    pub group_management: bool,
    pub role_management: bool,
    pub product_management: bool,
    pub technical_info: bool,
    pub storage_migration: bool,
    pub cards: bool,
    pub images: bool,
    pub booking_cards: bool,
    pub materials: bool,
    pub dms: bool,
}

impl MenuVisibility {
    pub fn compute(permissions: &Permissions, products: &Products) -> Self {
        let admin = permissions.is_admin();
        let user_management = permissions.has(USER_MANAGE);
        let group_management = permissions.has(GROUP_MANAGE);
        let role_management = permissions.has(ROLE_MANAGE);
        let product_management = permissions.has(PRODUCT_MANAGE);
        Self {
            management: admin
                || user_management
                || group_management
                || role_management
                || product_management,
            user_management,
            group_management,
            role_management,
            product_management,
            technical_info: admin,
            storage_migration: admin,
            cards: products.has(PRODUCT_CARDS),
            images: products.has(PRODUCT_IMAGES),
            booking_cards: products.has(PRODUCT_BOOKING_CARDS),
            materials: products.has(PRODUCT_MATERIALS),
            dms: products.has(PRODUCT_DMS),
        }
    }

    /// Used when the user or product lookup fails.
    pub fn hidden() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(names: &[&str]) -> Permissions {
        Permissions::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn products(names: &[&str]) -> Products {
        let list: Vec<Product> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Product {
                id: i as i64,
                name: n.to_string(),
                description: None,
            })
            .collect();
        Products::new(&list)
    }

    #[test]
    fn test_membership() {
        let p = perms(&["user.manage"]);
        assert!(p.has("user.manage"));
        assert!(!p.has("group.manage"));
        assert!(!p.is_admin());
    }

    #[test]
    fn test_admin_implies_everything() {
        let p = perms(&["system.admin"]);
        assert!(p.has("user.manage"));
        assert!(p.has("anything.at.all"));
    }

    #[test]
    fn test_menu_single_permission() {
        let menu = MenuVisibility::compute(&perms(&["group.manage"]), &products(&[]));
        assert!(menu.management);
        assert!(menu.group_management);
        assert!(!menu.user_management);
        assert!(!menu.technical_info);
        assert!(!menu.storage_migration);
    }

    #[test]
    fn test_menu_admin() {
        let menu = MenuVisibility::compute(&perms(&["system.admin"]), &products(&[]));
        assert!(menu.management);
        assert!(menu.user_management);
        assert!(menu.product_management);
        assert!(menu.technical_info);
        assert!(menu.storage_migration);
    }

    #[test]
    fn test_menu_products() {
        let menu = MenuVisibility::compute(
            &perms(&[]),
            &products(&["Lernkarten", "Lernmaterial"]),
        );
        assert!(!menu.management);
        assert!(menu.cards);
        assert!(menu.materials);
        assert!(!menu.images);
        assert!(!menu.dms);
        assert!(!menu.booking_cards);
    }

    #[test]
    fn test_hidden() {
        assert_eq!(MenuVisibility::hidden(), MenuVisibility::default());
        assert!(!MenuVisibility::hidden().cards);
    }
}
