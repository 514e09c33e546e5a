mod dust;
mod helpers;
